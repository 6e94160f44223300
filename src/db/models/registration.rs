// Registration Record Model
// A certificate owner and their ordered contact URIs

use serde::{Deserialize, Serialize};
use url::Url;

/// Registration record in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: i64,
    /// Contact URIs in registration order, e.g. "mailto:admin@example.com"
    pub contacts: Vec<String>,
}

impl RegistrationRecord {
    /// Create new registration record
    pub fn new(id: i64) -> Self {
        Self {
            id,
            contacts: Vec::new(),
        }
    }

    /// Set contact URIs
    pub fn with_contacts(mut self, contacts: Vec<String>) -> Self {
        self.contacts = contacts;
        self
    }

    /// Addresses of all mailto contacts, in registration order.
    /// Contacts with any other scheme are not eligible recipients.
    pub fn mailto_addresses(&self) -> Vec<String> {
        self.contacts
            .iter()
            .filter_map(|contact| {
                let url = Url::parse(contact).ok()?;
                if url.scheme() == "mailto" {
                    Some(url.path().to_string())
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailto_addresses() {
        let reg = RegistrationRecord::new(1).with_contacts(vec![
            "mailto:admin@example.com".to_string(),
            "mailto:ops@example.com".to_string(),
        ]);

        assert_eq!(
            reg.mailto_addresses(),
            vec!["admin@example.com", "ops@example.com"]
        );
    }

    #[test]
    fn test_non_mailto_contacts_filtered() {
        let reg = RegistrationRecord::new(1).with_contacts(vec![
            "tel:+15555551212".to_string(),
            "mailto:admin@example.com".to_string(),
            "https://example.com/contact".to_string(),
        ]);

        assert_eq!(reg.mailto_addresses(), vec!["admin@example.com"]);
    }

    #[test]
    fn test_no_contacts() {
        let reg = RegistrationRecord::new(1);
        assert!(reg.mailto_addresses().is_empty());
    }

    #[test]
    fn test_malformed_contact_ignored() {
        let reg = RegistrationRecord::new(1)
            .with_contacts(vec!["not a uri".to_string(), "mailto:a@example.com".to_string()]);

        assert_eq!(reg.mailto_addresses(), vec!["a@example.com"]);
    }
}
