//! Read-only projection of a quote into a printable document.
//!
//! [`DocumentProjection`] turns a quote plus company data into a [`BudgetDocument`]
//! whose fields are already formatted for display. Renderers only lay it out.

pub mod print;
pub mod renderer;

use reformas_core::{CoreError, CurrencyFormatter, DateFormatter, QuantityFormatter};
use reformas_domain::{CompanyProfile, Quote};
use serde::Serialize;
use tracing::warn;

pub use print::{HtmlFilePrinter, PrintReceipt, Printer};
pub use renderer::{DocumentRenderer, HtmlDocumentRenderer, RenderedDocument};

/// Shown in place of an empty project address.
pub const UNDEFINED_LOCATION: &str = "A definir";
/// Signature caption under the client's name.
pub const CLIENT_CAPTION: &str = "Contratante";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetDocument {
    pub title: String,
    pub header: DocumentHeader,
    /// Client name followed by address and phone when present.
    pub client_line: Vec<String>,
    pub project: ProjectBanner,
    pub items: Vec<ItemRow>,
    pub total: String,
    /// Present only when at least one item carries materials.
    pub materials: Option<Vec<MaterialGroup>>,
    /// Present only when the quote has an execution schedule.
    pub schedule: Option<Vec<ScheduleRow>>,
    pub execution_time: String,
    pub payments: Vec<PaymentRow>,
    pub terms: String,
    pub signatures: Vec<SignatureBlock>,
    pub footer: DocumentFooter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentHeader {
    pub company_name: String,
    pub cnpj: String,
    pub quote_number: String,
    pub issued_on: String,
    pub valid_until: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectBanner {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemRow {
    pub position: usize,
    pub service: String,
    pub quantity: String,
    pub unit: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialGroup {
    /// `service (quantity unit)`
    pub heading: String,
    pub rows: Vec<MaterialRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialRow {
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleRow {
    pub task: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentRow {
    /// `description (pct%)`
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignatureBlock {
    pub name: String,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentFooter {
    pub contact_line: String,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SocialKind {
    Website,
    Instagram,
    Facebook,
    GoogleBusiness,
}

impl SocialKind {
    pub fn icon(self) -> &'static str {
        match self {
            SocialKind::Website => "🌐",
            SocialKind::Instagram => "📷",
            SocialKind::Facebook => "📘",
            SocialKind::GoogleBusiness => "📍",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SocialLink {
    pub kind: SocialKind,
    pub icon: String,
    pub label: String,
}

/// Anything that can format money, quantities and dates for a document.
pub trait DocumentFormatter: CurrencyFormatter + QuantityFormatter + DateFormatter {}

impl<T: CurrencyFormatter + QuantityFormatter + DateFormatter> DocumentFormatter for T {}

pub struct DocumentProjection;

impl DocumentProjection {
    /// Projects `quote` for printing. Fails only when no client is selected.
    pub fn project(
        company: &CompanyProfile,
        quote: &Quote,
        formatter: &dyn DocumentFormatter,
    ) -> Result<BudgetDocument, CoreError> {
        let client = quote
            .client
            .as_ref()
            .ok_or_else(|| CoreError::Validation("quote has no client".into()))?;

        let client_line = std::iter::once(client.name.clone())
            .chain(non_empty(client.address.as_deref()))
            .chain(non_empty(client.phone.as_deref()))
            .collect();

        let items = quote
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemRow {
                position: index + 1,
                service: item.service.clone(),
                quantity: formatter.format_quantity(item.quantity()),
                unit: item.unit.clone(),
                total: formatter.format_amount(item.total()),
            })
            .collect();

        let material_groups: Vec<MaterialGroup> = quote
            .items
            .iter()
            .filter(|item| item.has_materials())
            .map(|item| MaterialGroup {
                heading: format!(
                    "{} ({} {})",
                    item.service,
                    formatter.format_quantity(item.quantity()),
                    item.unit
                ),
                rows: item
                    .materials()
                    .iter()
                    .map(|material| MaterialRow {
                        name: material.name.clone(),
                        quantity: formatter.format_quantity(material.quantity),
                        unit: material.unit.clone(),
                    })
                    .collect(),
            })
            .collect();

        let schedule: Vec<ScheduleRow> = quote
            .execution_schedule
            .iter()
            .map(|entry| ScheduleRow {
                task: entry.task.clone(),
                period: entry.period.clone(),
            })
            .collect();

        let status = quote.payment_status();
        if !status.balanced {
            warn!(
                number = %quote.number,
                total_percentage = %status.total_percentage,
                "printing a payment schedule that does not sum to 100%"
            );
        }
        let payments = quote
            .materialized_installments()
            .into_iter()
            .map(|installment| PaymentRow {
                label: format!(
                    "{} ({})",
                    installment.description,
                    formatter.format_percentage(installment.percentage)
                ),
                value: formatter.format_amount(installment.value),
            })
            .collect();

        let location = if quote.project.address.trim().is_empty() {
            UNDEFINED_LOCATION.to_string()
        } else {
            quote.project.address.clone()
        };

        Ok(BudgetDocument {
            title: format!("Orçamento - {}", quote.project.name),
            header: DocumentHeader {
                company_name: company.name.clone(),
                cnpj: company.cnpj.clone(),
                quote_number: quote.number.clone(),
                issued_on: formatter.format_date(quote.created_at.date_naive()),
                valid_until: formatter.format_date(quote.valid_until),
            },
            client_line,
            project: ProjectBanner {
                name: quote.project.name.clone(),
                location,
            },
            items,
            total: formatter.format_amount(quote.total()),
            materials: (!material_groups.is_empty()).then_some(material_groups),
            schedule: (!schedule.is_empty()).then_some(schedule),
            execution_time: quote.execution_time.clone(),
            payments,
            terms: quote.terms.clone(),
            signatures: vec![
                SignatureBlock {
                    name: company.responsible.clone(),
                    caption: company.name.clone(),
                },
                SignatureBlock {
                    name: client.name.clone(),
                    caption: CLIENT_CAPTION.to_string(),
                },
            ],
            footer: footer(company),
        })
    }
}

fn footer(company: &CompanyProfile) -> DocumentFooter {
    let social_links = [
        (SocialKind::Website, &company.website),
        (SocialKind::Instagram, &company.instagram),
        (SocialKind::Facebook, &company.facebook),
        (SocialKind::GoogleBusiness, &company.google_business),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(kind, value)| SocialLink {
        kind,
        icon: kind.icon().to_string(),
        label: value.clone(),
    })
    .collect();

    DocumentFooter {
        contact_line: format!(
            "{} | Tel: {} | {}",
            company.name, company.phone, company.email
        ),
        social_links,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
