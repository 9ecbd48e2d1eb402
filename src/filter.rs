//! Domain allow-list and mailbox ignore-list
//!
//! Both lists match case-insensitively and exactly. There is no
//! wildcard or sub-domain expansion: `example.com` accepts
//! `bob@example.com` but not `bob@mail.example.com`.

use crate::envelope::EnvelopeAddress;

/// Decides which mailboxes are scanned and which addresses are kept.
///
/// # Examples
///
/// ```
/// use hackmeck::{AddressFilter, EnvelopeAddress};
///
/// let filter = AddressFilter::new(["example.com"], ["Drafts"]);
///
/// assert!(filter.accepts(&EnvelopeAddress::new("bob", "EXAMPLE.com")));
/// assert!(!filter.accepts(&EnvelopeAddress::new("bob", "mail.example.com")));
/// assert!(filter.is_ignored("drafts"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFilter {
    domains: Vec<String>,
    ignored: Vec<String>,
}

impl AddressFilter {
    #[must_use]
    pub fn new<D, I>(domains: D, ignored: I) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().to_lowercase())
                .collect(),
            ignored: ignored
                .into_iter()
                .map(|m| m.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether the decoded mailbox `name` is on the ignore-list.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.ignored.iter().any(|m| *m == name)
    }

    /// Whether the domain is allow-listed.
    #[must_use]
    pub fn allows_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.domains.iter().any(|d| *d == domain)
    }

    /// The address is complete and its domain is allow-listed.
    #[must_use]
    pub fn accepts(&self, address: &EnvelopeAddress) -> bool {
        address.is_complete() && self.allows_domain(&address.domain)
    }
}
