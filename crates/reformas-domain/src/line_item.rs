//! Quote line items and the material bill derived from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalog::*, common::*, DomainError};

/// Material quantity required by a line item, scaled to its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialInstance {
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
}

/// Derives the material bill for `quantity` units of a service.
///
/// Pure: identical inputs always yield identical output.
pub fn derive_materials(
    templates: &[MaterialTemplate],
    quantity: Decimal,
) -> Result<Vec<MaterialInstance>, DomainError> {
    templates
        .iter()
        .map(|template| {
            Ok(MaterialInstance {
                name: template.name.clone(),
                unit: template.unit.clone(),
                quantity: ceil_quantity(checked_product(quantity, template.quantity_per_unit)?),
            })
        })
        .collect()
}

/// One priced row of a quote.
///
/// Service name, unit, unit price and material templates are copied from the
/// catalog when the item is created; later catalog edits never reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "LineItemRecord")]
pub struct LineItem {
    pub id: Uuid,
    pub service_id: String,
    pub service: String,
    pub description: String,
    pub unit: String,
    quantity: Decimal,
    unit_price: Decimal,
    material_templates: Vec<MaterialTemplate>,
    materials: Vec<MaterialInstance>,
}

impl LineItem {
    /// Builds a fresh line item for `quantity` units of `entry`.
    pub fn from_entry(entry: &ServiceCatalogEntry, quantity: Decimal) -> Result<Self, DomainError> {
        let quantity = ensure_positive_quantity(quantity)?;
        let unit_price = ensure_non_negative("unitPrice", entry.unit_price)?;
        checked_product(quantity, unit_price)?;
        let materials = derive_materials(&entry.material_templates, quantity)?;
        Ok(Self {
            id: Uuid::new_v4(),
            service_id: entry.id.clone(),
            service: entry.name.clone(),
            description: String::new(),
            unit: entry.unit.clone(),
            quantity,
            unit_price,
            material_templates: entry.material_templates.clone(),
            materials,
        })
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity × unit_price`, computed on every call.
    ///
    /// Every constructor checks this product against [`MAX_AMOUNT`], so it cannot overflow.
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    pub fn materials(&self) -> &[MaterialInstance] {
        &self.materials
    }

    pub fn material_templates(&self) -> &[MaterialTemplate] {
        &self.material_templates
    }

    pub fn has_materials(&self) -> bool {
        !self.materials.is_empty()
    }

    /// Changes the quantity and recomputes the material bill in one step.
    pub fn set_quantity(&mut self, quantity: Decimal) -> Result<(), DomainError> {
        let quantity = ensure_positive_quantity(quantity)?;
        checked_product(quantity, self.unit_price)?;
        self.materials = derive_materials(&self.material_templates, quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

impl Identifiable for LineItem {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for LineItem {
    fn name(&self) -> &str {
        &self.service
    }
}

impl Amounted for LineItem {
    fn amount(&self) -> Decimal {
        self.total()
    }
}

impl Displayable for LineItem {
    fn display_label(&self) -> String {
        format!("{} ({} {})", self.service, self.quantity.normalize(), self.unit)
    }
}

/// Wire shape of a line item; derived fields are rebuilt on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    id: Uuid,
    #[serde(default)]
    service_id: String,
    service: String,
    #[serde(default)]
    description: String,
    unit: String,
    quantity: Decimal,
    unit_price: Decimal,
    #[serde(default)]
    material_templates: Vec<MaterialTemplate>,
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = DomainError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        let quantity = ensure_positive_quantity(record.quantity)?;
        let unit_price = ensure_non_negative("unitPrice", record.unit_price)?;
        checked_product(quantity, unit_price)?;
        let materials = derive_materials(&record.material_templates, quantity)?;
        Ok(Self {
            id: record.id,
            service_id: record.service_id,
            service: record.service,
            description: record.description,
            unit: record.unit,
            quantity,
            unit_price,
            material_templates: record.material_templates,
            materials,
        })
    }
}
