//! Account-level address scan

use crate::collector::{AddressSet, collect_addresses};
use crate::config::ImapConfig;
use crate::connection;
use crate::error::Result;
use crate::filter::AddressFilter;
use crate::session::{ImapMailSession, MailSession};
use tracing::warn;

/// Connects to one IMAP account and collects its recipient addresses.
pub struct AccountScanner {
    config: ImapConfig,
}

impl AccountScanner {
    #[must_use]
    pub const fn new(config: ImapConfig) -> Self {
        Self { config }
    }

    /// Connect, log in, collect addresses from every mailbox and log
    /// out.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting, logging in, listing, opening or
    /// fetching any mailbox fails. A failed LOGOUT is only logged.
    pub async fn scan(&self, filter: &AddressFilter) -> Result<AddressSet> {
        let session = connection::connect(&self.config).await?;
        let mut session = ImapMailSession::new(session);

        let addresses = collect_addresses(&mut session, filter).await?;

        if let Err(e) = session.logout().await {
            warn!("Logout failed: {}", e);
        }
        Ok(addresses)
    }
}
