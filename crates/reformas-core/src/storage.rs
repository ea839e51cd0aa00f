use std::{collections::BTreeMap, sync::RwLock};

use chrono::Utc;
use reformas_domain::Quote;

use crate::CoreError;

/// Persistence boundary for quote snapshots. Each save writes the full aggregate.
pub trait QuoteStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Quote>, CoreError>;
    fn save(&self, key: &str, quote: &Quote) -> Result<(), CoreError>;
    fn delete(&self, key: &str) -> Result<(), CoreError>;
    fn list(&self) -> Result<Vec<String>, CoreError>;
}

/// Keeps serialized snapshots in memory, the same shape a key-value store would hold.
#[derive(Debug, Default)]
pub struct InMemoryQuoteStore {
    snapshots: RwLock<BTreeMap<String, String>>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON held for `key`, if any.
    pub fn snapshot(&self, key: &str) -> Result<Option<String>, CoreError> {
        let guard = self.snapshots.read().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }
}

impl QuoteStore for InMemoryQuoteStore {
    fn load(&self, key: &str) -> Result<Option<Quote>, CoreError> {
        match self.snapshot(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, quote: &Quote) -> Result<(), CoreError> {
        let json = serde_json::to_string(quote)?;
        let mut guard = self.snapshots.write().map_err(poisoned)?;
        guard.insert(key.to_string(), json);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CoreError> {
        let mut guard = self.snapshots.write().map_err(poisoned)?;
        guard
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| CoreError::QuoteNotFound(key.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, CoreError> {
        let guard = self.snapshots.read().map_err(poisoned)?;
        Ok(guard.keys().cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CoreError {
    CoreError::Storage("quote store lock poisoned".into())
}

/// Flags states a user would want to fix before sending a quote out.
pub fn quote_warnings(quote: &Quote) -> Vec<String> {
    let mut warnings = Vec::new();
    if quote.client.is_none() {
        warnings.push(format!("quote {} has no client", quote.number));
    }
    if quote.items.is_empty() {
        warnings.push(format!("quote {} has no items", quote.number));
    }
    let status = quote.payment_status();
    if !status.balanced {
        warnings.push(format!(
            "payment schedule of quote {} sums to {}%",
            quote.number, status.total_percentage
        ));
    }
    if quote.valid_until < Utc::now().date_naive() {
        warnings.push(format!(
            "quote {} expired on {}",
            quote.number, quote.valid_until
        ));
    }
    warnings
}
