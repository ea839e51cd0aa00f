use std::str::FromStr;

use reformas_domain::{
    ensure_positive_quantity, LineItem, NamedEntity, ServiceCatalogEntry, ServiceCategory,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::CoreError;

/// Ordered, read-only list of priced services.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceCatalog {
    entries: Vec<ServiceCatalogEntry>,
}

impl ServiceCatalog {
    /// Builds a catalog, rejecting duplicate ids and entries with negative prices.
    pub fn new(entries: Vec<ServiceCatalogEntry>) -> Result<Self, CoreError> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate()?;
            if entries[..index].iter().any(|other| other.id == entry.id) {
                return Err(CoreError::Validation(format!(
                    "duplicate catalog entry id `{}`",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ServiceCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Result<&ServiceCatalogEntry, CoreError> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CoreError::CatalogEntryNotFound(id.to_string()))
    }

    /// Case-insensitive match on name or description, optionally narrowed to a category.
    pub fn search(&self, text: &str, category: Option<ServiceCategory>) -> Vec<&ServiceCatalogEntry> {
        let needle = text.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| category.map_or(true, |wanted| entry.category == wanted))
            .filter(|entry| {
                needle.is_empty()
                    || entry.name().to_lowercase().contains(&needle)
                    || entry.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Turns a catalog selection plus a quantity into a priced line item.
pub struct CatalogResolver;

impl CatalogResolver {
    /// Builds a fresh line item with derived materials. Pure apart from the new id.
    pub fn resolve(entry: &ServiceCatalogEntry, quantity: Decimal) -> Result<LineItem, CoreError> {
        let quantity = ensure_positive_quantity(quantity)?;
        let item = LineItem::from_entry(entry, quantity)?;
        debug!(
            service = %entry.id,
            %quantity,
            materials = item.materials().len(),
            "resolved catalog entry"
        );
        Ok(item)
    }

    pub fn resolve_by_id(
        catalog: &ServiceCatalog,
        entry_id: &str,
        quantity: Decimal,
    ) -> Result<LineItem, CoreError> {
        let entry = catalog.entry(entry_id)?;
        Self::resolve(entry, quantity)
    }
}

/// Parses a user-typed quantity. Accepts `,` as the decimal separator.
pub fn parse_quantity(input: &str) -> Result<Decimal, CoreError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(CoreError::Validation("quantity is required".into()));
    }
    let value = Decimal::from_str(&normalized)
        .map_err(|_| CoreError::Validation(format!("`{}` is not a number", input.trim())))?;
    Ok(ensure_positive_quantity(value)?)
}

/// Like [`parse_quantity`], but substitutes 1 for anything unusable.
pub fn parse_quantity_lenient(input: &str) -> Decimal {
    parse_quantity(input).unwrap_or(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reformas_domain::MaterialTemplate;
    use rust_decimal_macros::dec;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(vec![
            ServiceCatalogEntry::new("1", "Pintura de parede", "m²", dec!(18))
                .unwrap()
                .with_category(ServiceCategory::Pintura)
                .with_description("Pintura com tinta acrílica")
                .with_material(MaterialTemplate::new("Tinta", "litro", dec!(0.2)).unwrap()),
            ServiceCatalogEntry::new("2", "Instalação de tomada", "un", dec!(50))
                .unwrap()
                .with_category(ServiceCategory::Eletrica),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let entry = ServiceCatalogEntry::new("1", "A", "un", dec!(1)).unwrap();
        let err = ServiceCatalog::new(vec![entry.clone(), entry]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn search_filters_by_text_and_category() {
        let catalog = catalog();
        assert_eq!(catalog.search("", None).len(), 2);
        assert_eq!(catalog.search("ACRÍLICA", None)[0].id, "1");
        assert_eq!(catalog.search("tomada", Some(ServiceCategory::Eletrica)).len(), 1);
        assert!(catalog.search("tomada", Some(ServiceCategory::Pintura)).is_empty());
    }

    #[test]
    fn unknown_entry_is_not_found() {
        let err = CatalogResolver::resolve_by_id(&catalog(), "99", dec!(1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn resolve_rejects_non_positive_quantity() {
        let catalog = catalog();
        let entry = catalog.entry("1").unwrap();
        assert!(matches!(
            CatalogResolver::resolve(entry, dec!(0)),
            Err(CoreError::InvalidQuantity(_))
        ));
        assert!(matches!(
            CatalogResolver::resolve(entry, dec!(-2)),
            Err(CoreError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn resolve_is_pure_over_materials() {
        let catalog = catalog();
        let entry = catalog.entry("1").unwrap();
        let first = CatalogResolver::resolve(entry, dec!(7.5)).unwrap();
        let second = CatalogResolver::resolve(entry, dec!(7.5)).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.materials(), second.materials());
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity("2,5").unwrap(), dec!(2.5));
        assert_eq!(parse_quantity(" 10 ").unwrap(), dec!(10));
        assert!(matches!(parse_quantity("abc"), Err(CoreError::Validation(_))));
        assert!(matches!(parse_quantity(""), Err(CoreError::Validation(_))));
        assert!(matches!(parse_quantity("0"), Err(CoreError::InvalidQuantity(_))));
        assert_eq!(parse_quantity_lenient("abc"), Decimal::ONE);
        assert_eq!(parse_quantity_lenient("-3"), Decimal::ONE);
        assert_eq!(parse_quantity_lenient("4.25"), dec!(4.25));
    }
}
