//! Advisor mail received through `emailCreate` events.

use desktop_app_contract::Email;

#[derive(Debug, Clone, Default, PartialEq)]
/// Append-only inbox, oldest first.
pub struct EmailInbox {
    emails: Vec<Email>,
}

impl EmailInbox {
    /// Creates an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `email`.
    pub fn create_email(&mut self, email: Email) {
        self.emails.push(email);
    }

    /// Most recently received mail.
    pub fn latest_email(&self) -> Option<&Email> {
        self.emails.last()
    }

    /// Iterates mail oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Email> {
        self.emails.iter()
    }

    /// Number of received mails.
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Returns `true` when the inbox is empty.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::Severity;
    use pretty_assertions::assert_eq;

    use super::*;

    fn email(title: &str) -> Email {
        Email {
            title: title.to_string(),
            content: "Budget review".to_string(),
            sender: "Finance advisor".to_string(),
            severity: Severity::Warning,
        }
    }

    #[test]
    fn inbox_keeps_arrival_order() {
        let mut inbox = EmailInbox::new();
        assert!(inbox.latest_email().is_none());
        inbox.create_email(email("first"));
        inbox.create_email(email("second"));

        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox.latest_email().map(|e| e.title.as_str()), Some("second"));
        assert_eq!(
            inbox.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }
}
