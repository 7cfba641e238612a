//! Domain models for the FDP to Babbage conversion.
//!
//! Two families of structures live here:
//!
//! - Input side: [`Mapping`] (the `mapping` block of a Fiscal DataPackage),
//!   its [`MeasureSpec`] / [`DimensionSpec`] / [`AttributeSpec`] entries, and
//!   the externally resolved [`FieldTranslator`].
//! - Output side: [`BabbageModel`] and its [`BabbageMeasure`],
//!   [`BabbageDimension`], [`BabbageAttribute`] and [`Hierarchy`] entries.
//!
//! All mappings are [`IndexMap`]s so that iteration follows the order of the
//! source document and serialized models are stable across runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Field Translation
// =============================================================================

/// Physical column backing an abstract FDP field key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslatedField {
    /// Physical column name in the fact table.
    pub name: String,
    /// Physical datatype (e.g. `integer`, `string`, `date`).
    #[serde(rename = "type")]
    pub datatype: String,
}

impl TranslatedField {
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
        }
    }
}

/// Field key -> physical column, produced by the column-resolution step.
pub type FieldTranslator = IndexMap<String, TranslatedField>;

// =============================================================================
// FDP Mapping (input)
// =============================================================================

/// The `mapping` block of a Fiscal DataPackage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Mapping {
    pub measures: IndexMap<String, MeasureSpec>,
    pub dimensions: IndexMap<String, DimensionSpec>,
}

/// A single measure declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasureSpec {
    /// Field key of the column holding the amounts.
    pub source: String,
    /// Resource the measure is restricted to; `None` means every resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// ISO currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl MeasureSpec {
    /// Whether this measure belongs to `resource_name`.
    pub fn applies_to(&self, resource_name: &str) -> bool {
        self.resource.as_deref().map_or(true, |r| r == resource_name)
    }
}

/// A dimension declaration: a set of attributes plus the key identifying a member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionSpec {
    pub attributes: IndexMap<String, AttributeSpec>,
    #[serde(rename = "primaryKey")]
    pub primary_key: PrimaryKey,
}

/// A dimension attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeSpec {
    /// Field key of the backing column.
    pub source: String,
    /// Name of the attribute this one is the human-readable label of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labelfor: Option<String>,
}

/// Primary key of a dimension, either one attribute or an ordered list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PrimaryKey {
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKey {
    /// Key parts in declaration order. A single key is a one-element slice.
    pub fn parts(&self) -> &[String] {
        match self {
            PrimaryKey::Single(key) => std::slice::from_ref(key),
            PrimaryKey::Composite(keys) => keys,
        }
    }

    /// True when the key spans more than one attribute.
    pub fn is_composite(&self) -> bool {
        self.parts().len() > 1
    }
}

// =============================================================================
// Babbage Model (output)
// =============================================================================

/// A model descriptor loadable by the Babbage OLAP engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BabbageModel {
    pub fact_table: String,
    pub measures: IndexMap<String, BabbageMeasure>,
    pub dimensions: IndexMap<String, BabbageDimension>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub hierarchies: IndexMap<String, Hierarchy>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BabbageMeasure {
    pub label: String,
    pub column: String,
    pub orig_measure: String,
    // Omitted rather than null when the FDP measure has no currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BabbageDimension {
    pub attributes: IndexMap<String, BabbageAttribute>,
    pub label: String,
    pub key_attribute: String,
    pub orig_dimension: String,
    /// Physical column of the key's label attribute, if one is declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_attribute: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BabbageAttribute {
    pub column: String,
    pub label: String,
    pub datatype: String,
    pub orig_attribute: String,
}

impl BabbageAttribute {
    /// Attribute named `name` backed by `field`.
    pub fn from_field(name: &str, field: &TranslatedField) -> Self {
        Self {
            column: field.name.clone(),
            label: name.to_string(),
            datatype: field.datatype.clone(),
            orig_attribute: name.to_string(),
        }
    }
}

/// Ordered levels derived from a composite primary key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hierarchy {
    pub levels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_key_accepts_string_or_list() {
        let single: PrimaryKey = serde_json::from_value(json!("code")).unwrap();
        assert_eq!(single.parts(), ["code".to_string()]);
        assert!(!single.is_composite());

        let composite: PrimaryKey = serde_json::from_value(json!(["year", "month"])).unwrap();
        assert_eq!(composite.parts(), ["year".to_string(), "month".to_string()]);
        assert!(composite.is_composite());
    }

    #[test]
    fn test_one_element_list_is_not_composite() {
        let key: PrimaryKey = serde_json::from_value(json!(["code"])).unwrap();
        assert!(!key.is_composite());
    }

    #[test]
    fn test_mapping_keeps_declaration_order() {
        let mapping: Mapping = serde_json::from_str(
            r#"{
                "measures": {
                    "zeta": { "source": "z" },
                    "alpha": { "source": "a", "currency": "EUR" }
                },
                "dimensions": {}
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = mapping.measures.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(mapping.measures["alpha"].currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_dimension_requires_primary_key() {
        let result = serde_json::from_value::<DimensionSpec>(json!({
            "attributes": { "code": { "source": "c" } }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_measure_resource_scope() {
        let unscoped = MeasureSpec { source: "a".into(), resource: None, currency: None };
        let scoped = MeasureSpec { source: "a".into(), resource: Some("budget".into()), currency: None };

        assert!(unscoped.applies_to("anything"));
        assert!(scoped.applies_to("budget"));
        assert!(!scoped.applies_to("spending"));
    }

    #[test]
    fn test_translated_field_uses_type_key() {
        let field: TranslatedField =
            serde_json::from_value(json!({ "name": "amount", "type": "decimal" })).unwrap();
        assert_eq!(field, TranslatedField::new("amount", "decimal"));
    }

    #[test]
    fn test_optional_output_fields_are_omitted() {
        let measure = BabbageMeasure {
            label: "Amount".into(),
            column: "amount".into(),
            orig_measure: "Amount".into(),
            currency: None,
        };
        let value = serde_json::to_value(&measure).unwrap();
        assert!(value.get("currency").is_none());
    }

    #[test]
    fn test_empty_hierarchies_are_omitted() {
        let mut model = BabbageModel {
            fact_table: "budget".into(),
            ..BabbageModel::default()
        };
        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("hierarchies").is_none());

        model.hierarchies.insert(
            "date".into(),
            Hierarchy { levels: vec!["date_year".into(), "date_month".into()] },
        );
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["hierarchies"]["date"]["levels"], json!(["date_year", "date_month"]));

        let parsed: BabbageModel =
            serde_json::from_value(json!({ "fact_table": "t", "measures": {}, "dimensions": {} })).unwrap();
        assert!(parsed.hierarchies.is_empty());
    }
}
