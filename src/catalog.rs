//! Static catalog of the codes a client may submit for each field.
//!
//! Used to populate client forms and, when a [`CatalogPolicy`] other than
//! `Ignore` is configured, to vet incoming requests before feature assembly.
//!
//! [`CatalogPolicy`]: crate::types::CatalogPolicy

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::features::coerce;
use crate::types::{Field, InputRecord};

/// One legal code and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub value: i64,
    pub label: &'static str,
}

/// Display name and legal codes for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCatalog {
    pub name: &'static str,
    pub options: Vec<CatalogOption>,
}

impl FieldCatalog {
    /// Whether `value` is one of this field's codes.
    pub fn contains(&self, value: f64) -> bool {
        value.fract() == 0.0 && self.options.iter().any(|o| o.value as f64 == value)
    }
}

/// The full catalog, keyed by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub features: BTreeMap<Field, FieldCatalog>,
    pub note: &'static str,
}

/// A supplied value that is not in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogViolation {
    pub field: Field,
    pub value: f64,
}

impl fmt::Display for CatalogViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {} for field '{}' is not a known code",
            self.value, self.field
        )
    }
}

impl Catalog {
    /// Entry for one field.
    pub fn field(&self, field: Field) -> &FieldCatalog {
        // Every field is populated at construction.
        &self.features[&field]
    }

    /// Collect supplied values that fall outside the catalog.
    ///
    /// Missing fields take defaults downstream and are not checked. Values
    /// that are not numbers at all are left for feature assembly to report.
    pub fn violations(&self, record: &InputRecord) -> Vec<CatalogViolation> {
        Field::ALL
            .into_iter()
            .filter_map(|field| {
                let value = coerce(field, record.get(field)?).ok()?;
                (!self.field(field).contains(value)).then_some(CatalogViolation { field, value })
            })
            .collect()
    }
}

/// The process-wide catalog.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    let features = Field::ALL
        .into_iter()
        .map(|field| {
            let options = codes(field)
                .iter()
                .map(|&(value, label)| CatalogOption { value, label })
                .collect();
            (
                field,
                FieldCatalog {
                    name: field.display_name(),
                    options,
                },
            )
        })
        .collect();
    Catalog {
        features,
        note: "Input fields are expanded to the model's feature width; positions beyond the seven inputs hold a configured placeholder value.",
    }
});

fn codes(field: Field) -> &'static [(i64, &'static str)] {
    match field {
        Field::Fulfilment => &[(0, "Amazon.in"), (1, "Merchant")],
        Field::SalesChannel => &[(0, "Amazon.in"), (1, "Non-Amazon")],
        Field::Category => &[
            (1, "T-shirt"),
            (2, "Shirt"),
            (3, "Blazzer"),
            (4, "Trousers"),
            (5, "Perfume"),
            (6, "Wallet"),
            (7, "Socks"),
            (8, "Shoes"),
            (9, "Watch"),
        ],
        Field::Size => &[
            (1, "M"),
            (2, "L"),
            (3, "XL"),
            (4, "XXL"),
            (5, "S"),
            (6, "3XL"),
            (7, "XS"),
            (8, "Free"),
            (9, "6XL"),
            (10, "5XL"),
            (11, "4XL"),
        ],
        Field::ShipState => &[
            (1, "MAHARASHTRA"),
            (2, "KARNATAKA"),
            (3, "TAMIL NADU"),
            (4, "TELANGANA"),
            (5, "UTTAR PRADESH"),
            (6, "DELHI"),
            (7, "WEST BENGAL"),
            (8, "GUJARAT"),
            (9, "RAJASTHAN"),
            (10, "BIHAR"),
            (11, "NAGALAND"),
            (12, "MIZORAM"),
        ],
        Field::B2b => &[(0, "False"), (1, "True")],
        Field::Qty => &[
            (1, "1"),
            (0, "0"),
            (2, "2"),
            (3, "3"),
            (4, "4"),
            (5, "5"),
            (9, "9"),
            (15, "15"),
            (13, "13"),
            (8, "8"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_field_has_options() {
        let catalog = catalog();
        assert_eq!(catalog.features.len(), Field::COUNT);
        for field in Field::ALL {
            let entry = catalog.field(field);
            assert_eq!(entry.name, field.display_name());
            assert!(!entry.options.is_empty(), "{field} has no options");
        }
    }

    #[test]
    fn contains_requires_integral_listed_code() {
        let size = catalog().field(Field::Size);
        assert!(size.contains(11.0));
        assert!(!size.contains(12.0));
        assert!(!size.contains(1.5));
        assert!(!catalog().field(Field::Category).contains(0.0));
    }

    #[test]
    fn violations_skip_missing_and_non_numeric() {
        let record = InputRecord::from_value(json!({
            "category": 42,
            "size": "abc",
            "qty": 15,
        }))
        .unwrap();
        let violations = catalog().violations(&record);
        assert_eq!(
            violations,
            vec![CatalogViolation {
                field: Field::Category,
                value: 42.0
            }]
        );
        assert!(violations[0].to_string().contains("category"));
    }

    #[test]
    fn serializes_with_field_keys() {
        let json = serde_json::to_value(catalog()).unwrap();
        assert_eq!(json["features"]["ship_state"]["name"], "Ship State");
        assert_eq!(json["features"]["ship_state"]["options"][0]["label"], "MAHARASHTRA");
        assert_eq!(json["features"]["qty"]["options"][0]["value"], 1);
        assert!(json["note"].as_str().unwrap().contains("placeholder"));
    }
}
