//! Breach and paste records and the lookup service surface

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One data-breach incident affecting an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Breach {
    /// Stable identifier of the breach (e.g. `Adobe`).
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub breach_date: Option<NaiveDate>,
    #[serde(default)]
    pub pwn_count: u64,
    /// Compromised data categories (e.g. `Passwords`).
    #[serde(default)]
    pub data_classes: Vec<String>,
    #[serde(default = "verified_by_default")]
    pub is_verified: bool,
}

const fn verified_by_default() -> bool {
    true
}

/// One public paste containing an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Paste {
    /// Paste service (e.g. `Pastebin`).
    pub source: String,
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_count: u64,
}

/// Parameters of a breach lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreachQuery {
    /// Only return breaches of this domain.
    pub domain: Option<String>,
    /// Ask for names only instead of full records.
    pub truncate: bool,
    /// Include unverified breaches.
    pub include_unverified: bool,
}

impl BreachQuery {
    /// Full records, all domains.
    #[must_use]
    pub const fn full(include_unverified: bool) -> Self {
        Self {
            domain: None,
            truncate: false,
            include_unverified,
        }
    }
}

/// A breach-notification service.
///
/// An account that appears in no breach (or no paste) yields an
/// empty list, not an error.
#[async_trait]
pub trait BreachLookup: Send + Sync {
    async fn lookup_breaches(&self, email: &str, query: &BreachQuery) -> Result<Vec<Breach>>;

    async fn lookup_pastes(&self, email: &str) -> Result<Vec<Paste>>;
}
