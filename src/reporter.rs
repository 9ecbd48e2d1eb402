//! Sequential, rate-limited breach reporting
//!
//! Every address is looked up one after the other. A failed lookup is
//! logged and the batch moves on; only the rate limiter is shared
//! between iterations.

use crate::breach::{BreachLookup, BreachQuery};
use crate::collector::AddressSet;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Keeps consecutive remote calls at least `delay` apart.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_call: None,
        }
    }

    /// Wait until the next call is allowed, then record it.
    ///
    /// The first call never waits.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_call {
            tokio::time::sleep_until(last + self.delay).await;
        }
        self.last_call = Some(Instant::now());
    }
}

/// Counters from one reporter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Addresses processed.
    pub checked: usize,
    /// Addresses found in at least one breach.
    pub pwned: usize,
    /// Breach records reported.
    pub breaches: usize,
    /// Paste records reported.
    pub pastes: usize,
    /// Breach or paste lookups that failed.
    pub failed_lookups: usize,
}

/// Looks up every collected address against a breach service.
pub struct Reporter<L> {
    lookup: L,
    include_unverified: bool,
    limiter: RateLimiter,
}

impl<L: BreachLookup> Reporter<L> {
    /// `include_unverified` also requests unverified breaches and
    /// pastes.
    #[must_use]
    pub const fn new(lookup: L, include_unverified: bool, delay: Duration) -> Self {
        Self {
            lookup,
            include_unverified,
            limiter: RateLimiter::new(delay),
        }
    }

    /// Check every address and log what was found.
    ///
    /// Never fails: lookup errors are logged and counted.
    pub async fn run(&mut self, addresses: &AddressSet) -> ReportSummary {
        let mut summary = ReportSummary::default();
        let query = BreachQuery::full(self.include_unverified);

        for account in addresses.iter() {
            summary.checked += 1;

            self.limiter.acquire().await;
            info!("Check breaches for: {}", account);
            match self.lookup.lookup_breaches(account, &query).await {
                Ok(breaches) => {
                    if !breaches.is_empty() {
                        summary.pwned += 1;
                    }
                    for breach in &breaches {
                        summary.breaches += 1;
                        warn!(
                            account = %account,
                            name = %breach.name,
                            title = %breach.title,
                            domain = %breach.domain,
                            data_classes = ?breach.data_classes,
                            "Pwned account"
                        );
                    }
                }
                Err(e) => {
                    summary.failed_lookups += 1;
                    error!(account = %account, error = %e, "Error on check breaches for account");
                    continue;
                }
            }

            if !self.include_unverified {
                continue;
            }

            self.limiter.acquire().await;
            info!("Check pastes for: {}", account);
            match self.lookup.lookup_pastes(account).await {
                Ok(pastes) => {
                    for paste in &pastes {
                        summary.pastes += 1;
                        warn!(
                            account = %account,
                            source = %paste.source,
                            title = paste.title.as_deref().unwrap_or("-"),
                            "Paste account"
                        );
                    }
                }
                Err(e) => {
                    summary.failed_lookups += 1;
                    error!(account = %account, error = %e, "Error on check pastes for account");
                }
            }
        }

        summary
    }
}
