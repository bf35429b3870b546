//! Which recipients want alerts for which categories.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Recipient chat id -> subscribed category tags.
///
/// Iteration order is by recipient id, so deliveries are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subscriptions {
    recipients: BTreeMap<String, BTreeSet<String>>,
}

impl Subscriptions {
    /// Creates an empty subscription table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or extends) a recipient's subscription.
    pub fn subscribe<I, S>(mut self, recipient: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipients
            .entry(recipient.into())
            .or_default()
            .extend(categories.into_iter().map(Into::into));
        self
    }

    /// Returns true if `recipient` wants alerts for `category`.
    pub fn is_subscribed(&self, recipient: &str, category: &str) -> bool {
        self.recipients.get(recipient).is_some_and(|cats| cats.contains(category))
    }

    /// Recipients subscribed to `category`.
    pub fn recipients_for<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.recipients.keys().map(String::as_str).filter(move |r| self.is_subscribed(r, category))
    }

    /// Recipients subscribed to at least one of `categories`, each listed once.
    pub fn recipients_for_any(&self, categories: &[String]) -> Vec<&str> {
        self.recipients
            .keys()
            .map(String::as_str)
            .filter(|r| categories.iter().any(|c| self.is_subscribed(r, c)))
            .collect()
    }

    /// All recipients with their categories.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.recipients.iter().map(|(r, cats)| (r.as_str(), cats))
    }

    /// Number of recipients.
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    /// Returns true if nobody is subscribed to anything.
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}
