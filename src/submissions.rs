//! Contact messages and newsletter subscriptions.
//!
//! The storage contract is expressed by [`ContactStore`] and [`SubscriptionStore`]. Both validate
//! their input before writing anything; the in-memory implementations back tests and the CLI.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::forms::{ContactForm, FieldErrors, NewsletterForm};

/// A message left through the contact form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// A newsletter sign-up. There is at most one per email address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewsletterSubscription {
    pub id: u64,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("{0} is already subscribed")]
    DuplicateEmail(String),

    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },
}

impl StoreError {
    fn contact_not_found(id: u64) -> Self {
        StoreError::NotFound {
            entity: "contact submission",
            key: id.to_string(),
        }
    }

    fn subscription_not_found(email: &str) -> Self {
        StoreError::NotFound {
            entity: "newsletter subscription",
            key: email.to_owned(),
        }
    }
}

pub trait ContactStore: Send + Sync {
    /// Validates `form` and stores it as an unread submission.
    fn create(&self, form: &ContactForm) -> Result<ContactSubmission, StoreError>;
    fn get(&self, id: u64) -> Result<ContactSubmission, StoreError>;
    /// All submissions, newest first.
    fn list(&self) -> Result<Vec<ContactSubmission>, StoreError>;
    fn mark_read(&self, id: u64) -> Result<ContactSubmission, StoreError>;
}

pub trait SubscriptionStore: Send + Sync {
    /// Validates `form` and records an active subscription.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] when the address already has a subscription,
    /// whether or not it is still active.
    fn subscribe(&self, form: &NewsletterForm) -> Result<NewsletterSubscription, StoreError>;
    fn get_by_email(&self, email: &str) -> Result<NewsletterSubscription, StoreError>;
    fn unsubscribe(&self, email: &str) -> Result<NewsletterSubscription, StoreError>;
    fn list_active(&self) -> Result<Vec<NewsletterSubscription>, StoreError>;
}

#[derive(Debug, Default)]
struct ContactTable {
    next_id: u64,
    rows: BTreeMap<u64, ContactSubmission>,
}

#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    table: RwLock<ContactTable>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContactStore for InMemoryContactStore {
    fn create(&self, form: &ContactForm) -> Result<ContactSubmission, StoreError> {
        let valid = form.validate()?;

        let mut table = self.table.write();
        table.next_id += 1;
        let submission = ContactSubmission {
            id: table.next_id,
            name: valid.name,
            email: valid.email,
            subject: valid.subject,
            message: valid.message,
            phone: valid.phone,
            company: valid.company,
            created_at: Utc::now(),
            is_read: false,
        };
        table.rows.insert(submission.id, submission.clone());

        info!(
            "Stored contact submission {} from {}",
            submission.id, submission.email
        );
        Ok(submission)
    }

    fn get(&self, id: u64) -> Result<ContactSubmission, StoreError> {
        self.table
            .read()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::contact_not_found(id))
    }

    fn list(&self) -> Result<Vec<ContactSubmission>, StoreError> {
        let table = self.table.read();
        let mut submissions: Vec<ContactSubmission> = table.rows.values().cloned().collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(submissions)
    }

    fn mark_read(&self, id: u64) -> Result<ContactSubmission, StoreError> {
        let mut table = self.table.write();
        let submission = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::contact_not_found(id))?;
        submission.is_read = true;

        info!("Marked contact submission {} as read", id);
        Ok(submission.clone())
    }
}

#[derive(Debug, Default)]
struct SubscriptionTable {
    next_id: u64,
    by_email: BTreeMap<String, NewsletterSubscription>,
}

#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    table: RwLock<SubscriptionTable>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn subscribe(&self, form: &NewsletterForm) -> Result<NewsletterSubscription, StoreError> {
        let email = form.validate()?;

        let mut table = self.table.write();
        if table.by_email.contains_key(&email) {
            return Err(StoreError::DuplicateEmail(email));
        }

        table.next_id += 1;
        let subscription = NewsletterSubscription {
            id: table.next_id,
            email: email.clone(),
            subscribed_at: Utc::now(),
            is_active: true,
        };
        table.by_email.insert(email, subscription.clone());

        info!("Subscribed {} to the newsletter", subscription.email);
        Ok(subscription)
    }

    fn get_by_email(&self, email: &str) -> Result<NewsletterSubscription, StoreError> {
        self.table
            .read()
            .by_email
            .get(email)
            .cloned()
            .ok_or_else(|| StoreError::subscription_not_found(email))
    }

    fn unsubscribe(&self, email: &str) -> Result<NewsletterSubscription, StoreError> {
        let mut table = self.table.write();
        let subscription = table
            .by_email
            .get_mut(email)
            .ok_or_else(|| StoreError::subscription_not_found(email))?;
        subscription.is_active = false;

        info!("Unsubscribed {} from the newsletter", email);
        Ok(subscription.clone())
    }

    fn list_active(&self) -> Result<Vec<NewsletterSubscription>, StoreError> {
        let table = self.table.read();
        let mut active: Vec<NewsletterSubscription> = table
            .by_email
            .values()
            .filter(|subscription| subscription.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|subscription| subscription.id);
        Ok(active)
    }
}
