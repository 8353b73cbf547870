use std::fmt;

use email_address::EmailAddress;
use serde::Deserialize;

/// Invalid form input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormError {
    MissingName,
    InvalidEmail,
    MissingConsent,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            FormError::MissingName => "Please enter your full name",
            FormError::InvalidEmail => "Please enter a valid email address",
            FormError::MissingConsent => "Please agree to receive the preview",
        };

        write!(f, "{}", message)
    }
}

/// Post form
/// Data expected from the signup form, consent is only sent when checked
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub consent: Option<String>,
}

impl SignupForm {
    /// Check the fields the page marks as required
    pub fn validate(self) -> Result<ValidSignup, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let email = self.email.trim();
        if !EmailAddress::is_valid(email) {
            return Err(FormError::InvalidEmail);
        }

        if self.consent.is_none() {
            return Err(FormError::MissingConsent);
        }

        Ok(ValidSignup {
            name: name.to_owned(),
            email: email.to_owned(),
        })
    }
}

/// A signup that passed validation, consent included
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidSignup {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, consent: bool) -> SignupForm {
        SignupForm {
            name: name.to_owned(),
            email: email.to_owned(),
            consent: consent.then(|| "on".to_owned()),
        }
    }

    #[test]
    fn accepts_complete_form_and_trims() {
        let signup = form("  Jane Doe ", " jane@work.com", true).validate();

        assert_eq!(
            signup,
            Ok(ValidSignup {
                name: "Jane Doe".to_owned(),
                email: "jane@work.com".to_owned(),
            })
        );
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            form("   ", "jane@work.com", true).validate(),
            Err(FormError::MissingName)
        );
    }

    #[test]
    fn accepts_addresses_browsers_accept() {
        for email in ["jane@intranet", "jane.doe+preview@work.co.uk"] {
            assert!(form("Jane", email, true).validate().is_ok(), "{email}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "",
            "jane",
            "@work.com",
            "jane@",
            "jane@work..com",
            "ja ne@work.com",
            "a@b@c.com",
        ] {
            assert_eq!(
                form("Jane", email, true).validate(),
                Err(FormError::InvalidEmail),
                "{email}"
            );
        }
    }

    #[test]
    fn rejects_missing_consent() {
        assert_eq!(
            form("Jane", "jane@work.com", false).validate(),
            Err(FormError::MissingConsent)
        );
    }
}
