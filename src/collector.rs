//! Cross-mailbox recipient address collection
//!
//! Walks every mailbox of the account, reads the To and Cc lists of
//! every message envelope and keeps the allow-listed addresses in a
//! single case-insensitive set.

use crate::envelope::SequenceRange;
use crate::error::Result;
use crate::filter::AddressFilter;
use crate::session::MailSession;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Deduplicated, normalized (`local@domain`, lower-cased) addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet {
    addresses: BTreeSet<String>,
}

impl AddressSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already normalized address. Returns `false` when it
    /// was already present.
    pub fn insert(&mut self, normalized: String) -> bool {
        self.addresses.insert(normalized)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a AddressSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}

/// Collect allow-listed recipient addresses from every mailbox.
///
/// Mailboxes on the ignore-list and empty mailboxes are skipped. The
/// mailbox listing is fully drained before any mailbox is opened.
///
/// # Errors
///
/// Any failure to list, open or fetch a mailbox aborts the scan.
pub async fn collect_addresses<S>(session: &mut S, filter: &AddressFilter) -> Result<AddressSet>
where
    S: MailSession + ?Sized,
{
    debug!("List mailboxes");
    let mailboxes = session.list_mailboxes("*").collect().await?;

    let mut addresses = AddressSet::new();

    for mailbox in &mailboxes {
        debug!("Mailbox: {}", mailbox.name);

        if filter.is_ignored(&mailbox.name) {
            debug!("Ignore mailbox: {}", mailbox.name);
            continue;
        }

        let status = session.examine(&mailbox.raw_name).await?;
        let Some(range) = SequenceRange::all(status.exists) else {
            continue;
        };

        info!(
            "Collecting addresses from {:>5} messages in {}",
            status.exists, mailbox.name
        );

        let mut envelopes = session.fetch_envelopes(range);
        while let Some(envelope) = envelopes.next().await {
            for address in envelope.recipients().filter(|a| filter.accepts(a)) {
                if addresses.insert(address.normalized()) {
                    debug!("New address: {}", address.normalized());
                }
            }
        }
        envelopes.finish().await?;
    }

    info!("Collected {} distinct addresses", addresses.len());
    Ok(addresses)
}
