//! The narrow mail-session surface the collector depends on
//!
//! [`MailSession`] is what [`collect_addresses`](crate::collect_addresses)
//! talks to. [`ImapMailSession`] implements it on top of an
//! `async-imap` session; streaming commands run on a background task
//! and hand their results over through a [`Drain`].

use crate::connection::ImapSession;
use crate::drain::Drain;
use crate::envelope::{Envelope, EnvelopeAddress, MailboxInfo, MailboxStatus, SequenceRange};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Operations needed to walk every mailbox of an account.
#[async_trait]
pub trait MailSession: Send {
    /// Enumerate mailboxes under the root matching `pattern`.
    fn list_mailboxes(&mut self, pattern: &str) -> Drain<MailboxInfo>;

    /// Open a mailbox read-only.
    async fn examine(&mut self, name: &str) -> Result<MailboxStatus>;

    /// Fetch the envelopes of `range` in the currently open mailbox.
    fn fetch_envelopes(&mut self, range: SequenceRange) -> Drain<Envelope>;

    async fn logout(&mut self) -> Result<()>;
}

/// [`MailSession`] backed by a logged-in IMAP session.
///
/// The session sits behind a lock so a background LIST or FETCH task
/// can own it for the duration of one command.
pub struct ImapMailSession {
    inner: Arc<Mutex<ImapSession>>,
}

impl ImapMailSession {
    #[must_use]
    pub fn new(session: ImapSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }
}

#[async_trait]
impl MailSession for ImapMailSession {
    fn list_mailboxes(&mut self, pattern: &str) -> Drain<MailboxInfo> {
        let session = Arc::clone(&self.inner);
        let pattern = pattern.to_string();

        Drain::spawn(move |tx| async move {
            let mut session = session.lock_owned().await;
            let names = session
                .list(Some(""), Some(&pattern))
                .await
                .map_err(|e| Error::Imap(format!("List mailboxes failed: {e}")))?;
            let mut names = std::pin::pin!(names);
            let mut listed = 0usize;

            while let Some(item) = names.next().await {
                let name = item.map_err(|e| Error::Imap(format!("List mailboxes failed: {e}")))?;
                listed += 1;
                if tx.send(MailboxInfo::from_raw(name.name())).await.is_err() {
                    return Ok(());
                }
            }

            // The stream ends on the tagged reply whatever its status.
            // INBOX always exists, so an empty listing means LIST failed.
            if listed == 0 {
                return Err(Error::Imap(
                    "List mailboxes failed: server returned no mailboxes".to_string(),
                ));
            }
            Ok(())
        })
    }

    async fn examine(&mut self, name: &str) -> Result<MailboxStatus> {
        let mut session = self.inner.lock().await;
        let mailbox = session
            .examine(name)
            .await
            .map_err(|e| Error::Imap(format!("Failed to select {name}: {e}")))?;

        Ok(MailboxStatus {
            name: name.to_string(),
            exists: mailbox.exists,
        })
    }

    fn fetch_envelopes(&mut self, range: SequenceRange) -> Drain<Envelope> {
        let session = Arc::clone(&self.inner);

        Drain::spawn(move |tx| async move {
            let mut session = session.lock_owned().await;
            let fetches = session
                .fetch(range.to_string(), "ENVELOPE")
                .await
                .map_err(|e| Error::Imap(format!("Fetch {range} failed: {e}")))?;
            let mut fetches = std::pin::pin!(fetches);
            let mut received = 0u32;

            while let Some(item) = fetches.next().await {
                let fetch = item.map_err(|e| Error::Imap(format!("Fetch {range} failed: {e}")))?;
                if range.contains(fetch.message) {
                    received += 1;
                }
                let Some(raw) = fetch.envelope() else {
                    debug!("Message {} has no envelope", fetch.message);
                    continue;
                };

                let envelope = Envelope {
                    to: raw
                        .to
                        .iter()
                        .flatten()
                        .map(|a| EnvelopeAddress::from_raw(a.mailbox.as_deref(), a.host.as_deref()))
                        .collect(),
                    cc: raw
                        .cc
                        .iter()
                        .flatten()
                        .map(|a| EnvelopeAddress::from_raw(a.mailbox.as_deref(), a.host.as_deref()))
                        .collect(),
                };
                if tx.send(envelope).await.is_err() {
                    return Ok(());
                }
            }

            // A tagged NO or BAD also just ends the stream; a short
            // answer is the only sign of it.
            if received < range.count() {
                return Err(Error::Imap(format!(
                    "Fetch {range} failed: received {received} of {} messages",
                    range.count()
                )));
            }
            Ok(())
        })
    }

    async fn logout(&mut self) -> Result<()> {
        let mut session = self.inner.lock().await;
        session
            .logout()
            .await
            .map_err(|e| Error::Imap(format!("Logout failed: {e}")))
    }
}
