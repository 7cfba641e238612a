//! Build a Babbage model from an FDP mapping.
//!
//! # Architecture
//!
//! ```text
//! FDP mapping                                 Babbage model
//! ┌──────────────────────────────┐           ┌───────────────────────────────┐
//! │ measures: { Amount: ... }    │    →      │ measures: { amount: ... }     │
//! │ dimensions:                  │           │ dimensions:                   │
//! │   date: pk [year, month]     │    →      │   date_year, date_month       │
//! │   project: pk code           │    →      │   project (all attributes)    │
//! └──────────────────────────────┘           │ hierarchies:                  │
//!                                            │   date: [date_year,date_month]│
//!                                            └───────────────────────────────┘
//! ```
//!
//! A dimension with a composite key is split into one dimension per key part,
//! each carrying only its key attribute and that key's label. The parts are
//! tied back together as the levels of a hierarchy named after the original
//! dimension. A dimension with a single key keeps all its attributes.
//!
//! Level names (`base_keypart`) are claimed in the same name set as base
//! names; a level that clashes with an existing dimension gets a `_N` suffix.
//!
//! Every `source` must resolve through the [`FieldTranslator`]; the first
//! unresolved one aborts the build and no partial model is returned.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::labels::LabelResolver;
use crate::error::{ConvertResult, ModelError, ModelResult};
use crate::models::{
    AttributeSpec, BabbageAttribute, BabbageDimension, BabbageMeasure, BabbageModel,
    DimensionSpec, FieldTranslator, Hierarchy, Mapping, MeasureSpec, TranslatedField,
};
use crate::naming::{NameAllocator, NameKind};
use crate::package::DataPackage;

/// Build the Babbage model of `resource_name` from an FDP `mapping`.
///
/// `table_name` is copied to `fact_table`. Measures scoped to another
/// resource are skipped.
pub fn build(
    mapping: &Mapping,
    resource_name: &str,
    table_name: &str,
    translator: &FieldTranslator,
) -> ModelResult<BabbageModel> {
    let mut builder = ModelBuilder::new(resource_name, table_name, translator);

    for (orig_name, measure) in &mapping.measures {
        builder.add_measure(orig_name, measure)?;
    }
    for (orig_name, dimension) in &mapping.dimensions {
        builder.add_dimension(orig_name, dimension)?;
    }

    Ok(builder.finish())
}

/// Build the model of one resource of a loaded datapackage.
///
/// Fails if the package has no mapping, or declares resources and
/// `resource_name` is not one of them.
pub fn fdp_to_model(
    package: &DataPackage,
    table_name: &str,
    resource_name: &str,
    translator: &FieldTranslator,
) -> ConvertResult<BabbageModel> {
    let mapping = package.mapping()?;
    if !package.resources.is_empty() {
        package.resource(Some(resource_name))?;
    }
    Ok(build(mapping, resource_name, table_name, translator)?)
}

/// Accumulates measures, dimensions and hierarchy levels for one build.
struct ModelBuilder<'a> {
    resource_name: &'a str,
    translator: &'a FieldTranslator,
    measure_names: NameAllocator,
    dimension_names: NameAllocator,
    model: BabbageModel,
    hierarchies: IndexMap<String, Hierarchy>,
}

impl<'a> ModelBuilder<'a> {
    fn new(resource_name: &'a str, table_name: &str, translator: &'a FieldTranslator) -> Self {
        Self {
            resource_name,
            translator,
            measure_names: NameAllocator::new(NameKind::Measure),
            dimension_names: NameAllocator::new(NameKind::Dimension),
            model: BabbageModel {
                fact_table: table_name.to_string(),
                ..BabbageModel::default()
            },
            hierarchies: IndexMap::new(),
        }
    }

    fn add_measure(&mut self, orig_name: &str, measure: &MeasureSpec) -> ModelResult<()> {
        if !measure.applies_to(self.resource_name) {
            debug!(
                measure = orig_name,
                resource = ?measure.resource,
                "skipping measure scoped to another resource"
            );
            return Ok(());
        }

        let name = self.measure_names.allocate(orig_name);
        let field = self.lookup(&measure.source, || format!("measure '{}'", orig_name))?;

        self.model.measures.insert(
            name,
            BabbageMeasure {
                label: orig_name.to_string(),
                column: field.name.clone(),
                orig_measure: orig_name.to_string(),
                currency: measure.currency.clone(),
            },
        );
        Ok(())
    }

    fn add_dimension(&mut self, orig_name: &str, dimension: &DimensionSpec) -> ModelResult<()> {
        let name = self.dimension_names.allocate(orig_name);
        let keys = dimension.primary_key.parts();
        let composite = dimension.primary_key.is_composite();
        let labels = LabelResolver::from_attributes(orig_name, &dimension.attributes);

        for pkey in keys {
            // Levels share the dimension name set, so a level can neither
            // overwrite nor be overwritten by another dimension.
            let (label, dimname) = if composite {
                let dimname = self.dimension_names.reserve(&format!("{}_{}", name, pkey));
                (format!("{}.{}", name, pkey), dimname)
            } else {
                (name.clone(), name.clone())
            };

            let mut attributes = IndexMap::new();
            attributes.insert(
                pkey.clone(),
                self.resolve_attribute(orig_name, &dimension.attributes, pkey)?,
            );

            self.hierarchies
                .entry(name.clone())
                .or_default()
                .levels
                .push(dimname.clone());

            let key_label = labels.label_for(pkey);
            let mut label_attribute = None;
            if let Some(label_name) = key_label {
                let attr = self.resolve_attribute(orig_name, &dimension.attributes, label_name)?;
                label_attribute = Some(attr.column.clone());
                attributes.insert(label_name.to_string(), attr);
            }

            // Only single-key dimensions keep their remaining attributes.
            if !composite {
                for attr_name in dimension.attributes.keys() {
                    if attr_name == pkey || Some(attr_name.as_str()) == key_label {
                        continue;
                    }
                    let attr = self.resolve_attribute(orig_name, &dimension.attributes, attr_name)?;
                    attributes.insert(attr_name.clone(), attr);
                }
            }

            debug!(
                dimension = %dimname,
                orig_dimension = orig_name,
                attributes = attributes.len(),
                "emitting dimension"
            );

            let emitted = BabbageDimension {
                attributes,
                label,
                key_attribute: pkey.clone(),
                orig_dimension: orig_name.to_string(),
                label_attribute,
            };
            self.model.dimensions.insert(dimname, emitted);
        }

        Ok(())
    }

    fn finish(mut self) -> BabbageModel {
        self.hierarchies.retain(|_, hierarchy| hierarchy.levels.len() > 1);
        self.model.hierarchies = self.hierarchies;

        info!(
            fact_table = %self.model.fact_table,
            measures = self.model.measures.len(),
            dimensions = self.model.dimensions.len(),
            hierarchies = self.model.hierarchies.len(),
            "built babbage model"
        );
        self.model
    }

    /// Resolve attribute `attr_name` of dimension `dimension` to its output entry.
    fn resolve_attribute(
        &self,
        dimension: &str,
        attributes: &IndexMap<String, AttributeSpec>,
        attr_name: &str,
    ) -> ModelResult<BabbageAttribute> {
        let spec = attributes
            .get(attr_name)
            .ok_or_else(|| ModelError::UnknownAttribute {
                dimension: dimension.to_string(),
                attribute: attr_name.to_string(),
            })?;
        let field = self.lookup(&spec.source, || {
            format!("attribute '{}' of dimension '{}'", attr_name, dimension)
        })?;
        Ok(BabbageAttribute::from_field(attr_name, field))
    }

    fn lookup(
        &self,
        source: &str,
        context: impl FnOnce() -> String,
    ) -> ModelResult<&'a TranslatedField> {
        self.translator
            .get(source)
            .ok_or_else(|| ModelError::UnresolvedField {
                field: source.to_string(),
                context: context(),
            })
    }
}
