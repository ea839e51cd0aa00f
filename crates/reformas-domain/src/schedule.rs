//! Execution schedule rows shown on the printed quote.

use serde::{Deserialize, Serialize};

use crate::line_item::LineItem;

/// Label prefix used when a schedule is generated from the quote items.
pub const PERIOD_LABEL: &str = "Semana";

/// One step of the execution schedule; edited freely by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScheduleEntry {
    pub task: String,
    pub period: String,
}

impl ScheduleEntry {
    pub fn new(task: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            period: period.into(),
        }
    }
}

/// Seeds a schedule with one week per item, or a generic three-step plan.
///
/// The result is a starting point only; it is not kept in sync with the items.
pub fn seed_schedule(items: &[LineItem]) -> Vec<ScheduleEntry> {
    if items.is_empty() {
        return vec![
            ScheduleEntry::new("Preparação e mobilização", format!("{PERIOD_LABEL} 1")),
            ScheduleEntry::new("Execução principal", format!("{PERIOD_LABEL} 2-3")),
            ScheduleEntry::new("Acabamentos e limpeza", format!("{PERIOD_LABEL} 4")),
        ];
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            ScheduleEntry::new(item.service.clone(), format!("{PERIOD_LABEL} {}", index + 1))
        })
        .collect()
}
