use askama::Template;
use reformas_domain::{CompanyProfile, Quote};
use tracing::debug;

use crate::{currency::LocaleFormatter, errors::ReformasError};

use super::{BudgetDocument, DocumentProjection};

/// Self-contained markup for one quote, ready to hand to a [`super::Printer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub title: String,
    /// Language tag for the page (`pt-BR`).
    pub lang: String,
    pub html: String,
}

pub trait DocumentRenderer {
    fn render(&self, quote: &Quote) -> Result<RenderedDocument, ReformasError>;
}

#[derive(Template)]
#[template(path = "budget_document.html")]
struct BudgetDocumentTemplate<'a> {
    doc: &'a BudgetDocument,
}

/// Renders quotes to HTML with inline styles, using one company profile and locale.
#[derive(Debug, Clone)]
pub struct HtmlDocumentRenderer {
    company: CompanyProfile,
    formatter: LocaleFormatter,
}

impl HtmlDocumentRenderer {
    pub fn new(company: CompanyProfile, formatter: LocaleFormatter) -> Self {
        Self { company, formatter }
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    pub fn project(&self, quote: &Quote) -> Result<BudgetDocument, ReformasError> {
        Ok(DocumentProjection::project(
            &self.company,
            quote,
            &self.formatter,
        )?)
    }

    pub fn render_document(&self, document: &BudgetDocument) -> Result<RenderedDocument, ReformasError> {
        let html = BudgetDocumentTemplate { doc: document }.render()?;
        debug!(title = %document.title, bytes = html.len(), "rendered budget document");
        Ok(RenderedDocument {
            title: document.title.clone(),
            lang: self.formatter.locale.language_tag.clone(),
            html,
        })
    }
}

impl DocumentRenderer for HtmlDocumentRenderer {
    fn render(&self, quote: &Quote) -> Result<RenderedDocument, ReformasError> {
        let document = self.project(quote)?;
        self.render_document(&document)
    }
}
