//! Stateful owner of one quote while it is being edited.
//!
//! Derived values (line totals, the quote total and installment values) are always
//! read from the current items, so no mutation can leave them stale.

use reformas_domain::{
    seed_schedule, ClientInfo, LineItem, MaterializedInstallment, PaymentInstallment,
    PaymentScheduleStatus, ProjectInfo, Quote, QuoteDefaults, QuoteStatus, QuoteTotals,
    ScheduleEntry, ServiceCatalogEntry,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{CatalogResolver, CoreError, QuoteStore, ServiceCatalog};

/// Partial update for a payment installment. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct InstallmentChanges {
    pub description: Option<String>,
    pub percentage: Option<Decimal>,
}

/// Partial update for an execution schedule entry.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEntryChanges {
    pub task: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BudgetAggregator {
    quote: Quote,
}

impl BudgetAggregator {
    pub fn new(quote: Quote) -> Self {
        Self { quote }
    }

    /// Starts an empty quote from company defaults.
    pub fn create(number: impl Into<String>, defaults: &QuoteDefaults) -> Self {
        let quote = Quote::new(number, defaults);
        info!(number = %quote.number, id = %quote.id, "created quote");
        Self { quote }
    }

    pub fn load(store: &dyn QuoteStore, key: &str) -> Result<Self, CoreError> {
        let quote = store
            .load(key)?
            .ok_or_else(|| CoreError::QuoteNotFound(key.to_string()))?;
        debug!(key, number = %quote.number, "loaded quote");
        Ok(Self { quote })
    }

    /// Stamps `updated_at` and writes the full snapshot.
    pub fn save(&mut self, store: &dyn QuoteStore, key: &str) -> Result<(), CoreError> {
        self.quote.touch();
        store.save(key, &self.quote)?;
        info!(key, number = %self.quote.number, items = self.quote.items.len(), "saved quote");
        Ok(())
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn into_quote(self) -> Quote {
        self.quote
    }

    pub fn items(&self) -> &[LineItem] {
        &self.quote.items
    }

    pub fn set_client(&mut self, client: Option<ClientInfo>) {
        self.quote.client = client;
    }

    pub fn set_project(&mut self, project: ProjectInfo) {
        self.quote.project = project;
    }

    pub fn set_execution_time(&mut self, text: impl Into<String>) {
        self.quote.execution_time = text.into();
    }

    pub fn set_terms(&mut self, terms: impl Into<String>) {
        self.quote.terms = terms.into();
    }

    pub fn set_status(&mut self, status: QuoteStatus) {
        if self.quote.status != status {
            info!(number = %self.quote.number, from = %self.quote.status, to = %status, "quote status changed");
            self.quote.status = status;
        }
    }

    /// Appends a new line item. Repeated services stay separate items.
    pub fn add_item(
        &mut self,
        entry: &ServiceCatalogEntry,
        quantity: Decimal,
    ) -> Result<Uuid, CoreError> {
        let item = CatalogResolver::resolve(entry, quantity)?;
        let id = item.id;
        debug!(item = %id, service = %item.service, total = %item.total(), "added line item");
        self.quote.items.push(item);
        Ok(id)
    }

    pub fn add_item_by_id(
        &mut self,
        catalog: &ServiceCatalog,
        entry_id: &str,
        quantity: Decimal,
    ) -> Result<Uuid, CoreError> {
        let entry = catalog.entry(entry_id)?;
        self.add_item(entry, quantity)
    }

    /// Changes one item's quantity and recomputes its materials in place.
    pub fn update_item_quantity(&mut self, item_id: Uuid, quantity: Decimal) -> Result<(), CoreError> {
        let item = self
            .quote
            .item_mut(item_id)
            .ok_or(CoreError::LineItemNotFound(item_id))?;
        item.set_quantity(quantity)?;
        debug!(item = %item_id, %quantity, total = %item.total(), "updated line item quantity");
        Ok(())
    }

    pub fn update_item_description(
        &mut self,
        item_id: Uuid,
        description: impl Into<String>,
    ) -> Result<(), CoreError> {
        let item = self
            .quote
            .item_mut(item_id)
            .ok_or(CoreError::LineItemNotFound(item_id))?;
        item.description = description.into();
        Ok(())
    }

    /// Removes the item together with its materials. Absent ids are an error.
    pub fn remove_item(&mut self, item_id: Uuid) -> Result<LineItem, CoreError> {
        let position = self
            .quote
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(CoreError::LineItemNotFound(item_id))?;
        let removed = self.quote.items.remove(position);
        debug!(item = %item_id, service = %removed.service, "removed line item");
        Ok(removed)
    }

    pub fn add_installment(
        &mut self,
        description: impl Into<String>,
        percentage: Decimal,
    ) -> Result<usize, CoreError> {
        let installment = PaymentInstallment::new(description, percentage)?;
        self.quote.payment_schedule.push(installment);
        self.log_unbalanced_schedule();
        Ok(self.quote.payment_schedule.len() - 1)
    }

    /// Applies `changes` to the installment at `index`; nothing changes on error.
    pub fn update_installment(
        &mut self,
        index: usize,
        changes: InstallmentChanges,
    ) -> Result<(), CoreError> {
        let installment = self
            .quote
            .payment_schedule
            .get_mut(index)
            .ok_or(CoreError::InstallmentNotFound(index))?;
        if let Some(percentage) = changes.percentage {
            installment.set_percentage(percentage)?;
        }
        if let Some(description) = changes.description {
            installment.description = description;
        }
        self.log_unbalanced_schedule();
        Ok(())
    }

    pub fn remove_installment(&mut self, index: usize) -> Result<PaymentInstallment, CoreError> {
        if index >= self.quote.payment_schedule.len() {
            return Err(CoreError::InstallmentNotFound(index));
        }
        let removed = self.quote.payment_schedule.remove(index);
        self.log_unbalanced_schedule();
        Ok(removed)
    }

    pub fn compute_totals(&self) -> QuoteTotals {
        self.quote.totals()
    }

    /// Installment values against the current total. Unbalanced schedules are allowed.
    pub fn materialize_installments(&self) -> Vec<MaterializedInstallment> {
        self.log_unbalanced_schedule();
        self.quote.materialized_installments()
    }

    pub fn payment_status(&self) -> PaymentScheduleStatus {
        self.quote.payment_status()
    }

    /// Replaces the execution schedule with one seeded from the current items.
    pub fn generate_execution_schedule(&mut self) -> &[ScheduleEntry] {
        self.quote.execution_schedule = seed_schedule(&self.quote.items);
        debug!(
            entries = self.quote.execution_schedule.len(),
            "generated execution schedule"
        );
        &self.quote.execution_schedule
    }

    pub fn add_schedule_entry(&mut self, entry: ScheduleEntry) -> usize {
        self.quote.execution_schedule.push(entry);
        self.quote.execution_schedule.len() - 1
    }

    pub fn update_schedule_entry(
        &mut self,
        index: usize,
        changes: ScheduleEntryChanges,
    ) -> Result<(), CoreError> {
        let entry = self
            .quote
            .execution_schedule
            .get_mut(index)
            .ok_or(CoreError::ScheduleEntryNotFound(index))?;
        if let Some(task) = changes.task {
            entry.task = task;
        }
        if let Some(period) = changes.period {
            entry.period = period;
        }
        Ok(())
    }

    pub fn remove_schedule_entry(&mut self, index: usize) -> Result<ScheduleEntry, CoreError> {
        if index >= self.quote.execution_schedule.len() {
            return Err(CoreError::ScheduleEntryNotFound(index));
        }
        Ok(self.quote.execution_schedule.remove(index))
    }

    pub fn clear_execution_schedule(&mut self) {
        self.quote.execution_schedule.clear();
    }

    /// Checks the quote has what the printed document needs.
    pub fn validate_for_preview(&self) -> Result<(), CoreError> {
        if self.quote.client.is_none() {
            return Err(CoreError::Validation("select a client".into()));
        }
        if self.quote.project.name.trim().is_empty() {
            return Err(CoreError::Validation("project name is required".into()));
        }
        if self.quote.items.is_empty() {
            return Err(CoreError::Validation("add at least one service".into()));
        }
        Ok(())
    }

    fn log_unbalanced_schedule(&self) {
        let status = self.quote.payment_status();
        if !status.balanced {
            warn!(
                number = %self.quote.number,
                total_percentage = %status.total_percentage,
                "payment schedule does not sum to 100%"
            );
        }
    }
}
