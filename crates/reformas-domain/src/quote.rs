//! The quote aggregate and its derived totals.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    line_item::LineItem,
    party::{ClientInfo, ProjectInfo},
    payment::{default_payment_schedule, MaterializedInstallment, PaymentInstallment, PaymentScheduleStatus},
    schedule::ScheduleEntry,
    Identifiable,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

pub const DEFAULT_EXECUTION_TIME: &str = "30 dias úteis";
pub const DEFAULT_VALIDITY_DAYS: u32 = 15;

pub const DEFAULT_TERMS: &str = "TERMOS E CONDIÇÕES

1. VALIDADE DO ORÇAMENTO
Este orçamento tem validade de 15 (quinze) dias a partir da data de emissão.

2. FORMA DE PAGAMENTO
Conforme condições descritas acima.

3. PRAZO DE EXECUÇÃO
O prazo será definido após aprovação do orçamento e cronograma.

4. GARANTIA
Garantia de 1 (um) ano para vícios de execução.

5. MATERIAIS
Os materiais serão adquiridos conforme especificação aprovada pelo cliente.

6. ALTERAÇÕES
Qualquer alteração no escopo deve ser comunicada por escrito.";

/// Where a quote stands in the sales pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 6] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Approved,
        QuoteStatus::Rejected,
        QuoteStatus::InProgress,
        QuoteStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Rascunho",
            QuoteStatus::Sent => "Enviado",
            QuoteStatus::Approved => "Aprovado",
            QuoteStatus::Rejected => "Recusado",
            QuoteStatus::InProgress => "Em Andamento",
            QuoteStatus::Completed => "Concluído",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "rascunho" => Ok(QuoteStatus::Draft),
            "sent" | "enviado" => Ok(QuoteStatus::Sent),
            "approved" | "aprovado" => Ok(QuoteStatus::Approved),
            "rejected" | "recusado" => Ok(QuoteStatus::Rejected),
            "in_progress" | "em_andamento" => Ok(QuoteStatus::InProgress),
            "completed" | "concluido" | "concluído" => Ok(QuoteStatus::Completed),
            other => Err(format!("unknown quote status `{other}`")),
        }
    }
}

/// Company-level values copied into every new quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDefaults {
    pub terms: String,
    pub execution_time: String,
    pub payment_schedule: Vec<PaymentInstallment>,
    pub validity_days: u32,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            terms: DEFAULT_TERMS.into(),
            execution_time: DEFAULT_EXECUTION_TIME.into(),
            payment_schedule: default_payment_schedule(),
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

/// Sum of all line totals. No taxes or discounts are modelled, so the two match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub total: Decimal,
    pub item_count: usize,
}

/// Quote aggregate root. Persisted as one full JSON snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub number: String,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientInfo>,
    #[serde(default)]
    pub project: ProjectInfo,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub execution_time: String,
    #[serde(default)]
    pub payment_schedule: Vec<PaymentInstallment>,
    #[serde(default)]
    pub execution_schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub terms: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub valid_until: NaiveDate,
    #[serde(default = "Quote::schema_version_default")]
    pub schema_version: u8,
}

impl Quote {
    /// Creates an empty quote, copying terms and schedule from `defaults`.
    pub fn new(number: impl Into<String>, defaults: &QuoteDefaults) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            status: QuoteStatus::Draft,
            client: None,
            project: ProjectInfo::default(),
            items: Vec::new(),
            execution_time: defaults.execution_time.clone(),
            payment_schedule: defaults.payment_schedule.clone(),
            execution_schedule: Vec::new(),
            terms: defaults.terms.clone(),
            created_at: now,
            updated_at: now,
            valid_until: now.date_naive() + Duration::days(i64::from(defaults.validity_days)),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn item(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn totals(&self) -> QuoteTotals {
        let subtotal: Decimal = self.items.iter().map(LineItem::total).sum();
        QuoteTotals {
            subtotal,
            total: subtotal,
            item_count: self.items.len(),
        }
    }

    pub fn total(&self) -> Decimal {
        self.totals().total
    }

    /// Installments with values computed against the current total.
    pub fn materialized_installments(&self) -> Vec<MaterializedInstallment> {
        let total = self.total();
        self.payment_schedule
            .iter()
            .map(|installment| installment.materialize(total))
            .collect()
    }

    pub fn payment_status(&self) -> PaymentScheduleStatus {
        PaymentScheduleStatus::of(&self.payment_schedule)
    }

    pub fn has_materials(&self) -> bool {
        self.items.iter().any(LineItem::has_materials)
    }

    pub fn client_name(&self) -> &str {
        self.client.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Identifiable for Quote {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}
