use chrono::{Datelike, NaiveDate};
use reformas_domain::{Quote, QuoteStatus};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{CoreError, QuoteStore};

/// Prefix of generated quote numbers (`ORC-2024-007`).
pub const QUOTE_NUMBER_PREFIX: &str = "ORC";

/// One row of the quotes list.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSummary {
    pub key: String,
    pub id: Uuid,
    pub number: String,
    pub client: String,
    pub project: String,
    pub value: Decimal,
    pub status: QuoteStatus,
    pub created_on: NaiveDate,
    pub valid_until: NaiveDate,
}

impl QuoteSummary {
    pub fn from_quote(key: impl Into<String>, quote: &Quote) -> Self {
        Self {
            key: key.into(),
            id: quote.id,
            number: quote.number.clone(),
            client: quote.client_name().to_string(),
            project: quote.project.name.clone(),
            value: quote.total(),
            status: quote.status,
            created_on: quote.created_at.date_naive(),
            valid_until: quote.valid_until,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub search: String,
    pub status: Option<QuoteStatus>,
}

impl QuoteFilter {
    pub fn matches(&self, summary: &QuoteSummary) -> bool {
        if self.status.is_some_and(|status| status != summary.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || summary.client.to_lowercase().contains(&needle)
            || summary.project.to_lowercase().contains(&needle)
            || summary.number.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub total_value: Decimal,
}

pub struct QuoteIndexService;

impl QuoteIndexService {
    /// Loads every stored quote, ordered by number. Unreadable snapshots are skipped.
    pub fn summaries(store: &dyn QuoteStore) -> Result<Vec<QuoteSummary>, CoreError> {
        let mut summaries = Vec::new();
        for key in store.list()? {
            match store.load(&key) {
                Ok(Some(quote)) => summaries.push(QuoteSummary::from_quote(key, &quote)),
                Ok(None) => {}
                Err(err) => warn!(%key, error = %err, "skipping unreadable quote"),
            }
        }
        summaries.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(summaries)
    }

    pub fn filter<'a>(summaries: &'a [QuoteSummary], filter: &QuoteFilter) -> Vec<&'a QuoteSummary> {
        summaries.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Pending counts quotes that were sent and await an answer.
    pub fn stats<'a>(summaries: impl IntoIterator<Item = &'a QuoteSummary>) -> QuoteStats {
        summaries
            .into_iter()
            .fold(QuoteStats::default(), |mut stats, summary| {
                stats.total += 1;
                stats.total_value += summary.value;
                match summary.status {
                    QuoteStatus::Approved => stats.approved += 1,
                    QuoteStatus::Sent => stats.pending += 1,
                    _ => {}
                }
                stats
            })
    }

    pub fn change_status(
        store: &dyn QuoteStore,
        key: &str,
        status: QuoteStatus,
    ) -> Result<Quote, CoreError> {
        let mut quote = store
            .load(key)?
            .ok_or_else(|| CoreError::QuoteNotFound(key.to_string()))?;
        let previous = quote.status;
        quote.status = status;
        quote.touch();
        store.save(key, &quote)?;
        info!(%key, from = %previous, to = %status, "quote status changed");
        Ok(quote)
    }

    pub fn delete(store: &dyn QuoteStore, key: &str) -> Result<(), CoreError> {
        store.delete(key)?;
        info!(%key, "deleted quote");
        Ok(())
    }

    /// Next free number for `year`, continuing the highest sequence already used.
    pub fn next_number(summaries: &[QuoteSummary], year: i32) -> String {
        let prefix = format!("{QUOTE_NUMBER_PREFIX}-{year}-");
        let last = summaries
            .iter()
            .filter_map(|s| s.number.strip_prefix(&prefix))
            .filter_map(|seq| seq.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{prefix}{:03}", last + 1)
    }

    pub fn next_number_for(summaries: &[QuoteSummary], date: NaiveDate) -> String {
        Self::next_number(summaries, date.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BudgetAggregator, InMemoryQuoteStore};
    use reformas_domain::{ClientInfo, ProjectInfo, QuoteDefaults, ServiceCatalogEntry};
    use rust_decimal_macros::dec;

    fn seed(store: &InMemoryQuoteStore) {
        let service = ServiceCatalogEntry::new("1", "Pintura", "m²", dec!(100)).unwrap();
        let rows = [
            ("ORC-2024-001", "Maria Silva", "Cozinha", dec!(2), QuoteStatus::Approved),
            ("ORC-2024-002", "João Souza", "Banheiro", dec!(3), QuoteStatus::Sent),
            ("ORC-2024-003", "Ana Lima", "Fachada", dec!(1), QuoteStatus::Draft),
        ];
        for (number, client, project, qty, status) in rows {
            let mut agg = BudgetAggregator::create(number, &QuoteDefaults::default());
            agg.set_client(Some(ClientInfo::new(number, client)));
            agg.set_project(ProjectInfo::new(project, ""));
            agg.add_item(&service, qty).unwrap();
            agg.set_status(status);
            agg.save(store, number).unwrap();
        }
    }

    #[test]
    fn summaries_search_and_stats() {
        let store = InMemoryQuoteStore::new();
        seed(&store);
        let summaries = QuoteIndexService::summaries(&store).unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[1].client, "João Souza");
        assert_eq!(summaries[1].value, dec!(300));

        let stats = QuoteIndexService::stats(&summaries);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.total_value, dec!(600));

        let filter = QuoteFilter {
            search: "banh".into(),
            status: None,
        };
        let found = QuoteIndexService::filter(&summaries, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, "ORC-2024-002");

        let drafts = QuoteFilter {
            search: String::new(),
            status: Some(QuoteStatus::Draft),
        };
        let found = QuoteIndexService::filter(&summaries, &drafts);
        assert_eq!(QuoteIndexService::stats(found).total_value, dec!(100));
    }

    #[test]
    fn status_change_and_delete() {
        let store = InMemoryQuoteStore::new();
        seed(&store);
        let quote =
            QuoteIndexService::change_status(&store, "ORC-2024-003", QuoteStatus::Rejected).unwrap();
        assert_eq!(quote.status, QuoteStatus::Rejected);
        assert_eq!(
            store.load("ORC-2024-003").unwrap().unwrap().status,
            QuoteStatus::Rejected
        );

        QuoteIndexService::delete(&store, "ORC-2024-001").unwrap();
        assert!(store.load("ORC-2024-001").unwrap().is_none());
        assert!(QuoteIndexService::delete(&store, "ORC-2024-001")
            .unwrap_err()
            .is_not_found());
        assert!(QuoteIndexService::change_status(&store, "missing", QuoteStatus::Sent)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn next_number_continues_sequence_per_year() {
        let store = InMemoryQuoteStore::new();
        seed(&store);
        let summaries = QuoteIndexService::summaries(&store).unwrap();
        assert_eq!(QuoteIndexService::next_number(&summaries, 2024), "ORC-2024-004");
        assert_eq!(QuoteIndexService::next_number(&summaries, 2025), "ORC-2025-001");
        assert_eq!(QuoteIndexService::next_number(&[], 2024), "ORC-2024-001");
    }
}
