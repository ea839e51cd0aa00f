use std::fmt;

use colored::Colorize;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Success,
    Warning,
    Error,
}

/// Terminal output helpers shared by every command.
pub struct Formatter;

impl Formatter {
    pub fn new() -> Self {
        Self
    }

    /// Turns colors off for the whole process.
    pub fn disable_color(&self) {
        colored::control::set_override(false);
    }

    pub fn print_header(&self, title: impl fmt::Display) {
        println!("\n{}", self.apply_style(Style::Header, title));
    }

    pub fn print_info(&self, message: impl fmt::Display) {
        println!("{message}");
    }

    pub fn print_success(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Success, message));
    }

    pub fn print_warning(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Warning, message));
    }

    pub fn print_error(&self, message: impl fmt::Display) {
        eprintln!("{}", self.apply_style(Style::Error, message));
    }

    /// Label/value rows with the labels padded to a common width.
    pub fn print_two_column(&self, rows: &[(&str, &str)]) {
        let width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, value) in rows {
            let pad = width - label.chars().count();
            println!("  {}{} : {}", label, " ".repeat(pad), value);
        }
    }

    fn apply_style(&self, style: Style, message: impl fmt::Display) -> String {
        match style {
            Style::Header => format!("=== {message} ===").bold().blue().to_string(),
            Style::Success => format!("OK: {message}").green().to_string(),
            Style::Warning => format!("WARNING: {message}").yellow().to_string(),
            Style::Error => format!("ERROR: {message}").red().bold().to_string(),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}
