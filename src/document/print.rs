use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use askama::Template;
use reformas_config::PrintSettings;
use tracing::info;

use crate::errors::ReformasError;

use super::RenderedDocument;

/// Outcome of handing a document to a [`Printer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintReceipt {
    pub path: PathBuf,
    pub bytes: usize,
}

pub trait Printer {
    fn print(&self, document: &RenderedDocument) -> Result<PrintReceipt, ReformasError>;
}

#[derive(Template)]
#[template(path = "print_page.html")]
struct PrintPageTemplate<'a> {
    lang: &'a str,
    title: &'a str,
    margin_mm: u32,
    body: &'a str,
}

/// Wraps a rendered document into a standalone A4 page.
pub fn print_page(document: &RenderedDocument, settings: &PrintSettings) -> Result<String, ReformasError> {
    Ok(PrintPageTemplate {
        lang: &document.lang,
        title: &document.title,
        margin_mm: settings.margin_mm,
        body: &document.html,
    }
    .render()?)
}

/// Writes the print page to a file that a browser can open and print.
///
/// The file is complete once `print` returns; readers never see a partial page.
#[derive(Debug, Clone)]
pub struct HtmlFilePrinter {
    output: PathBuf,
    settings: PrintSettings,
}

impl HtmlFilePrinter {
    pub fn new(output: impl Into<PathBuf>, settings: PrintSettings) -> Self {
        Self {
            output: output.into(),
            settings,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Printer for HtmlFilePrinter {
    fn print(&self, document: &RenderedDocument) -> Result<PrintReceipt, ReformasError> {
        let page = print_page(document, &self.settings)?;
        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.output.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let mut file = File::create(&tmp)?;
        file.write_all(page.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.output)?;
        info!(path = %self.output.display(), title = %document.title, "print page ready");
        Ok(PrintReceipt {
            path: self.output.clone(),
            bytes: page.len(),
        })
    }
}
