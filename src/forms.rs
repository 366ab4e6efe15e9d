//! Contact and newsletter form validation.
//!
//! Each form is described by a table of fields and the rules applied to them. A single runner
//! walks the table and collects the failures into [`FieldErrors`]. Email and length checks use
//! the primitives of the [`validator`] crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{ValidateEmail, ValidateLength};

/// One check applied to a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// The value must contain something other than whitespace. Stops the chain on failure.
    Required(&'static str),
    /// The value is optional. An empty value stops the chain without an error.
    Optional,
    /// Character count bounds, inclusive.
    Length {
        min: Option<u64>,
        max: Option<u64>,
        message: &'static str,
    },
    /// The value must be a syntactically valid email address.
    Email(&'static str),
}

/// The rules of a single form field, applied in order.
#[derive(Clone, Copy, Debug)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

pub const CONTACT_FORM_RULES: &[FieldRules] = &[
    FieldRules {
        field: "name",
        rules: &[
            Rule::Required("Name is required"),
            Rule::Length {
                min: Some(2),
                max: Some(100),
                message: "Name must be between 2 and 100 characters",
            },
        ],
    },
    FieldRules {
        field: "email",
        rules: &[
            Rule::Required("Email is required"),
            Rule::Email("Please enter a valid email address"),
            Rule::Length {
                min: None,
                max: Some(120),
                message: "Email must be less than 120 characters",
            },
        ],
    },
    FieldRules {
        field: "subject",
        rules: &[
            Rule::Optional,
            Rule::Length {
                min: None,
                max: Some(200),
                message: "Subject must be less than 200 characters",
            },
        ],
    },
    FieldRules {
        field: "message",
        rules: &[
            Rule::Required("Message is required"),
            Rule::Length {
                min: Some(10),
                max: Some(2000),
                message: "Message must be between 10 and 2000 characters",
            },
        ],
    },
    FieldRules {
        field: "phone",
        rules: &[
            Rule::Optional,
            Rule::Length {
                min: None,
                max: Some(20),
                message: "Phone number must be less than 20 characters",
            },
        ],
    },
    FieldRules {
        field: "company",
        rules: &[
            Rule::Optional,
            Rule::Length {
                min: None,
                max: Some(100),
                message: "Company name must be less than 100 characters",
            },
        ],
    },
];

pub const NEWSLETTER_FORM_RULES: &[FieldRules] = &[FieldRules {
    field: "email",
    rules: &[
        Rule::Required("Email is required"),
        Rule::Email("Please enter a valid email address"),
        Rule::Length {
            min: None,
            max: Some(120),
            message: "Email must be less than 120 characters",
        },
    ],
}];

/// Field name to error messages, in rule order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages recorded for `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flattens the errors to one message per field.
    pub fn first_messages(&self) -> BTreeMap<&str, &str> {
        self.errors
            .iter()
            .filter_map(|(field, messages)| {
                messages
                    .first()
                    .map(|message| (field.as_str(), message.as_str()))
            })
            .collect()
    }

    fn push(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message.to_owned());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.first_messages() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Gives the validation runner access to raw field values by name.
pub trait FormInput {
    fn field(&self, name: &str) -> Option<&str>;
}

/// Runs every field's rule chain against `input`.
pub fn run_rules(table: &[FieldRules], input: &impl FormInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    for field in table {
        let value = input.field(field.field).unwrap_or("");
        for rule in field.rules {
            match check(rule, value) {
                Outcome::Pass => {}
                Outcome::Fail(message) => errors.push(field.field, message),
                Outcome::Stop(Some(message)) => {
                    errors.push(field.field, message);
                    break;
                }
                Outcome::Stop(None) => break,
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

enum Outcome {
    Pass,
    Fail(&'static str),
    Stop(Option<&'static str>),
}

fn check(rule: &Rule, value: &str) -> Outcome {
    let blank = value.trim().is_empty();
    match *rule {
        Rule::Required(message) if blank => Outcome::Stop(Some(message)),
        Rule::Required(_) => Outcome::Pass,
        Rule::Optional if blank => Outcome::Stop(None),
        Rule::Optional => Outcome::Pass,
        Rule::Length { min, max, message } => {
            if value.to_owned().validate_length(min, max, None) {
                Outcome::Pass
            } else {
                Outcome::Fail(message)
            }
        }
        Rule::Email(message) => {
            if value.to_owned().validate_email() {
                Outcome::Pass
            } else {
                Outcome::Fail(message)
            }
        }
    }
}

/// Raw contact form submission.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl FormInput for ContactForm {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "subject" => &self.subject,
            "message" => &self.message,
            "phone" => &self.phone,
            "company" => &self.company,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Contact form data that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl ContactForm {
    /// Copy of the form with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: trimmed(&self.name),
            email: trimmed(&self.email),
            subject: trimmed(&self.subject),
            message: trimmed(&self.message),
            phone: trimmed(&self.phone),
            company: trimmed(&self.company),
        }
    }

    /// Validates the trimmed form and returns exactly the values that were checked.
    ///
    /// Blank optional fields become `None`.
    pub fn validate(&self) -> Result<ValidContact, FieldErrors> {
        let form = self.trimmed();
        run_rules(CONTACT_FORM_RULES, &form)?;
        Ok(ValidContact {
            name: form.name.unwrap_or_default(),
            email: form.email.unwrap_or_default(),
            subject: non_empty(form.subject),
            message: form.message.unwrap_or_default(),
            phone: non_empty(form.phone),
            company: non_empty(form.company),
        })
    }
}

/// Raw newsletter sign-up.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct NewsletterForm {
    pub email: Option<String>,
}

impl FormInput for NewsletterForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "email" => self.email.as_deref(),
            _ => None,
        }
    }
}

impl NewsletterForm {
    /// Validates the trimmed email address and returns it.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let form = Self {
            email: trimmed(&self.email),
        };
        run_rules(NEWSLETTER_FORM_RULES, &form)?;
        Ok(form.email.unwrap_or_default())
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|value| value.trim().to_owned())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
            ..ContactForm::default()
        }
    }

    #[test]
    fn name_length_bounds() {
        let err = contact("A", "a@example.com", "Hello there!").validate().unwrap_err();
        assert_eq!(
            err.message("name"),
            Some("Name must be between 2 and 100 characters")
        );

        assert!(contact("Al", "a@example.com", "Hello there!").validate().is_ok());
    }

    #[test]
    fn lengths_are_checked_on_the_stored_text() {
        let err = contact(" A", "a@example.com", "         x").validate().unwrap_err();
        assert_eq!(
            err.message("name"),
            Some("Name must be between 2 and 100 characters")
        );
        assert_eq!(
            err.message("message"),
            Some("Message must be between 10 and 2000 characters")
        );

        let valid = contact("  Al  ", " a@example.com ", "  1234567890  ")
            .validate()
            .expect("trimmed values are long enough");
        assert_eq!(valid.name, "Al");
        assert_eq!(valid.email, "a@example.com");
        assert_eq!(valid.message, "1234567890");
    }

    #[test]
    fn message_length_bounds() {
        let err = contact("Alice", "a@example.com", "123456789").validate().unwrap_err();
        assert_eq!(
            err.message("message"),
            Some("Message must be between 10 and 2000 characters")
        );

        assert!(contact("Alice", "a@example.com", "1234567890").validate().is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = contact("Alice", "not-an-email", "Hello there!").validate().unwrap_err();
        assert_eq!(err.message("email"), Some("Please enter a valid email address"));
        assert_eq!(err.first_messages().len(), 1);
    }

    #[test]
    fn missing_required_fields_stop_their_chain() {
        let err = ContactForm::default().validate().unwrap_err();
        assert_eq!(err.messages("name"), ["Name is required".to_string()]);
        assert_eq!(err.message("email"), Some("Email is required"));
        assert_eq!(err.message("message"), Some("Message is required"));
        assert_eq!(err.message("subject"), None);
    }

    #[test]
    fn optional_fields_are_checked_only_when_present() {
        let mut form = contact("Alice", "a@example.com", "Hello there!");
        form.phone = Some("   ".into());
        let valid = form.validate().expect("blank phone is fine");
        assert_eq!(valid.phone, None);

        form.phone = Some("1".repeat(21));
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.message("phone"),
            Some("Phone number must be less than 20 characters")
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let form = contact("Zoë", "a@example.com", "ééééééééé\u{e9}");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn newsletter_email_rules() {
        // well-formed, but 141 characters long
        let domain = format!("{0}.{0}.{0}.example.com", "a".repeat(40));
        let form = NewsletterForm {
            email: Some(format!("reader@{}", domain)),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.messages("email"),
            ["Email must be less than 120 characters".to_string()]
        );

        let ok = NewsletterForm {
            email: Some(" reader@example.com ".into()),
        };
        assert_eq!(ok.validate().expect("valid"), "reader@example.com");
    }

    #[test]
    fn errors_serialize_as_a_field_map() {
        let err = contact("A", "a@example.com", "Hello there!").validate().unwrap_err();
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(
            json["name"][0],
            "Name must be between 2 and 100 characters"
        );
    }
}
