//! Reverse index of `labelfor` pointers within a dimension.
//!
//! An FDP attribute may declare `labelfor: <attr>` to mark itself as the
//! human-readable label of another attribute (usually a key). The builder
//! needs the opposite direction: given a key attribute, which attribute
//! labels it.

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::warn;

use crate::models::AttributeSpec;

/// Maps a target attribute to the attribute declared as its label.
#[derive(Debug, Clone, Default)]
pub struct LabelResolver<'a> {
    labels: HashMap<&'a str, &'a str>,
}

impl<'a> LabelResolver<'a> {
    /// Index the `labelfor` pointers of a dimension's attributes.
    ///
    /// When two attributes label the same target, the one declared last wins.
    pub fn from_attributes(dimension: &str, attributes: &'a IndexMap<String, AttributeSpec>) -> Self {
        let mut labels = HashMap::new();

        for (label_name, attr) in attributes {
            let Some(target) = attr.labelfor.as_deref() else {
                continue;
            };
            if let Some(previous) = labels.insert(target, label_name.as_str()) {
                warn!(
                    dimension,
                    target,
                    previous,
                    replacement = %label_name,
                    "multiple labels declared for one attribute, keeping the last"
                );
            }
        }

        Self { labels }
    }

    /// Label attribute of `attribute`, if any.
    pub fn label_for(&self, attribute: &str) -> Option<&'a str> {
        self.labels.get(attribute).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes(value: serde_json::Value) -> IndexMap<String, AttributeSpec> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolves_label_for_key() {
        let attrs = attributes(json!({
            "code": { "source": "f_code" },
            "name": { "source": "f_name", "labelfor": "code" },
            "notes": { "source": "f_notes" }
        }));
        let labels = LabelResolver::from_attributes("project", &attrs);

        assert_eq!(labels.label_for("code"), Some("name"));
        assert_eq!(labels.label_for("name"), None);
        assert_eq!(labels.label_for("notes"), None);
    }

    #[test]
    fn test_no_labels() {
        let attrs = attributes(json!({ "code": { "source": "f_code" } }));
        let labels = LabelResolver::from_attributes("project", &attrs);
        assert_eq!(labels.label_for("code"), None);
    }

    #[test]
    fn test_last_declared_label_wins() {
        let attrs: IndexMap<String, AttributeSpec> = serde_json::from_str(
            r#"{
                "code": { "source": "f_code" },
                "short_name": { "source": "f_short", "labelfor": "code" },
                "long_name": { "source": "f_long", "labelfor": "code" }
            }"#,
        )
        .unwrap();
        let labels = LabelResolver::from_attributes("project", &attrs);

        assert_eq!(labels.label_for("code"), Some("long_name"));
    }
}
