//! Breach check for the recipients of an IMAP account
//!
//! Scans every mailbox of one account over IMAPS, collects the
//! distinct To/Cc addresses whose domain is on an allow-list, then
//! checks each address against
//! [Have I Been Pwned](https://haveibeenpwned.com), one rate-limited
//! request at a time.
//!
//! The two phases are [`AccountScanner`] (or [`collect_addresses`]
//! over any [`MailSession`]) and [`Reporter`] (over any
//! [`BreachLookup`], usually a [`HibpClient`]).

mod breach;
mod collector;
mod config;
mod connection;
mod drain;
mod envelope;
mod error;
mod filter;
mod hibp;
mod reporter;
mod scanner;
mod session;

pub use breach::{Breach, BreachLookup, BreachQuery, Paste};
pub use collector::{AddressSet, collect_addresses};
pub use config::{
    DEFAULT_HIBP_URL, DEFAULT_IMAP_PORT, DEFAULT_LOOKUP_DELAY, HibpConfig, ImapConfig,
    TlsVerification,
};
pub use connection::{ImapSession, connect};
pub use drain::Drain;
pub use envelope::{Envelope, EnvelopeAddress, MailboxInfo, MailboxStatus, SequenceRange};
pub use error::{Error, Result};
pub use filter::AddressFilter;
pub use hibp::HibpClient;
pub use reporter::{RateLimiter, ReportSummary, Reporter};
pub use scanner::AccountScanner;
pub use session::{ImapMailSession, MailSession};
