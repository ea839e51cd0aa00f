//! Service catalog entries and the material templates attached to them.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{common::*, DomainError};

/// Units of measure offered when registering a service.
pub const SERVICE_UNITS: &[&str] = &["m²", "m", "un", "h", "diária", "verba"];

/// Units of measure offered when registering a material.
pub const MATERIAL_UNITS: &[&str] = &[
    "un", "kg", "m", "m²", "litro", "saco", "rolo", "caixa", "pacote",
];

/// Trade grouping used to filter the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Alvenaria,
    Eletrica,
    Hidraulica,
    Pintura,
    Piso,
    Gesso,
    Marcenaria,
    Demolicao,
    Acabamento,
    #[default]
    Outros,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 10] = [
        ServiceCategory::Alvenaria,
        ServiceCategory::Eletrica,
        ServiceCategory::Hidraulica,
        ServiceCategory::Pintura,
        ServiceCategory::Piso,
        ServiceCategory::Gesso,
        ServiceCategory::Marcenaria,
        ServiceCategory::Demolicao,
        ServiceCategory::Acabamento,
        ServiceCategory::Outros,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ServiceCategory::Alvenaria => "Alvenaria",
            ServiceCategory::Eletrica => "Elétrica",
            ServiceCategory::Hidraulica => "Hidráulica",
            ServiceCategory::Pintura => "Pintura",
            ServiceCategory::Piso => "Piso",
            ServiceCategory::Gesso => "Gesso",
            ServiceCategory::Marcenaria => "Marcenaria",
            ServiceCategory::Demolicao => "Demolição",
            ServiceCategory::Acabamento => "Acabamento",
            ServiceCategory::Outros => "Outros",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Material consumed per unit of the parent service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialTemplate {
    pub name: String,
    pub unit: String,
    pub quantity_per_unit: Decimal,
}

impl MaterialTemplate {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity_per_unit: Decimal,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: name.into(),
            unit: unit.into(),
            quantity_per_unit: ensure_non_negative("quantityPerUnit", quantity_per_unit)?,
        })
    }
}

impl NamedEntity for MaterialTemplate {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A priced service the company offers, as listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: ServiceCategory,
    pub unit: String,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, rename = "materials")]
    pub material_templates: Vec<MaterialTemplate>,
}

impl ServiceCatalogEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            category: ServiceCategory::default(),
            unit: unit.into(),
            unit_price: ensure_non_negative("unitPrice", unit_price)?,
            description: String::new(),
            material_templates: Vec::new(),
        })
    }

    pub fn with_category(mut self, category: ServiceCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_material(mut self, template: MaterialTemplate) -> Self {
        self.material_templates.push(template);
        self
    }

    /// Re-checks the invariants of an entry that was deserialized from outside.
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_non_negative("unitPrice", self.unit_price)?;
        for template in &self.material_templates {
            ensure_non_negative("quantityPerUnit", template.quantity_per_unit)?;
        }
        Ok(())
    }
}

impl Identifiable for ServiceCatalogEntry {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

impl NamedEntity for ServiceCatalogEntry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for ServiceCatalogEntry {
    fn display_label(&self) -> String {
        format!("{} ({}/{})", self.name, self.unit_price, self.unit)
    }
}
