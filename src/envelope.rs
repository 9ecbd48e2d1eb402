//! Mailbox and envelope types
//!
//! Owned copies of the few IMAP response fields the collector reads.
//! Everything else in an envelope (sender, subject, date) is dropped
//! at the session boundary.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use std::fmt;

/// One entry of a LIST response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxInfo {
    /// Decoded display name, used for matching and logging.
    pub name: String,
    /// Name as sent by the server (modified UTF-7), used in commands.
    pub raw_name: String,
}

impl MailboxInfo {
    /// Decode a LISTed name. A malformed name is kept as sent.
    #[must_use]
    pub fn from_raw(raw_name: &str) -> Self {
        Self {
            name: decode_mailbox_name(raw_name).unwrap_or_else(|| raw_name.to_string()),
            raw_name: raw_name.to_string(),
        }
    }
}

/// Decode an IMAP modified UTF-7 mailbox name (RFC 3501 Section 5.1.3).
///
/// `&-` is a literal `&`; any other `&...-` run is UTF-16BE in base64
/// with `,` in place of `/` and no padding.
#[must_use]
pub fn decode_mailbox_name(raw: &str) -> Option<String> {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let shifted = &rest[start + 1..];
        let end = shifted.find('-')?;
        let run = &shifted[..end];

        if run.is_empty() {
            decoded.push('&');
        } else {
            let bytes = STANDARD_NO_PAD.decode(run.replace(',', "/")).ok()?;
            if bytes.len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            decoded.push_str(&String::from_utf16(&units).ok()?);
        }
        rest = &shifted[end + 1..];
    }

    decoded.push_str(rest);
    Some(decoded)
}

/// Result of opening a mailbox read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxStatus {
    pub name: String,
    /// Number of messages in the mailbox.
    pub exists: u32,
}

/// An address from an envelope's To or Cc list.
///
/// IMAP reports missing parts as `NIL`; those become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvelopeAddress {
    pub local_part: String,
    pub domain: String,
}

impl EnvelopeAddress {
    #[must_use]
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    /// Build from raw IMAP address fields, decoding lossily.
    #[must_use]
    pub fn from_raw(mailbox: Option<&[u8]>, host: Option<&[u8]>) -> Self {
        let decode = |raw: Option<&[u8]>| {
            raw.map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default()
        };
        Self {
            local_part: decode(mailbox),
            domain: decode(host),
        }
    }

    /// Both the local-part and the domain are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.local_part.is_empty() && !self.domain.is_empty()
    }

    /// Lower-cased `local@domain`, the deduplication key.
    #[must_use]
    pub fn normalized(&self) -> String {
        format!(
            "{}@{}",
            self.local_part.to_lowercase(),
            self.domain.to_lowercase()
        )
    }
}

impl fmt::Display for EnvelopeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

/// Recipient lists of one message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    pub to: Vec<EnvelopeAddress>,
    pub cc: Vec<EnvelopeAddress>,
}

impl Envelope {
    /// To and Cc addresses, in that order.
    pub fn recipients(&self) -> impl Iterator<Item = &EnvelopeAddress> {
        self.to.iter().chain(self.cc.iter())
    }
}

/// An inclusive 1-based message sequence range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRange {
    pub first: u32,
    pub last: u32,
}

impl SequenceRange {
    /// Every message of a mailbox holding `count` messages, or `None`
    /// when it is empty.
    #[must_use]
    pub const fn all(count: u32) -> Option<Self> {
        if count == 0 {
            None
        } else {
            Some(Self {
                first: 1,
                last: count,
            })
        }
    }

    /// Number of messages in the range.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.last.saturating_sub(self.first).saturating_add(1)
    }

    /// Whether message number `seq` falls inside the range.
    #[must_use]
    pub const fn contains(&self, seq: u32) -> bool {
        self.first <= seq && seq <= self.last
    }
}

impl fmt::Display for SequenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}
