//! # fdp2babbage - Fiscal DataPackage to Babbage model conversion
//!
//! Translates the `mapping` of a Fiscal DataPackage (measures and dimensions
//! declared over a fact table) into a model descriptor for the Babbage OLAP
//! query engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ FDP mapping  │──┐
//! └──────────────┘  │   ┌──────────────┐     ┌───────────────┐
//!                   ├──▶│ ModelBuilder │────▶│ Babbage model │
//! ┌──────────────┐  │   │ (+ naming)   │     │    (JSON)     │
//! │ field trans. │──┘   └──────────────┘     └───────────────┘
//! └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fdp2babbage::{build, DataPackage, load_field_translator};
//!
//! let package = DataPackage::from_file("datapackage.json")?;
//! let translator = load_field_translator("fields.json")?;
//! let model = build(package.mapping()?, "budget", "budget_table", &translator)?;
//! println!("{}", serde_json::to_string_pretty(&model)?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - FDP input and Babbage output structures
//! - [`naming`] - Unique storage-safe names
//! - [`transform`] - The model builder
//! - [`package`] - Descriptor and field translator loading

// Core modules
pub mod error;
pub mod models;

// Naming
pub mod naming;

// Transformation
pub mod transform;

// Loading
pub mod package;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError, ConvertResult, ModelError, ModelResult, PackageError, PackageResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AttributeSpec,
    BabbageAttribute,
    BabbageDimension,
    BabbageMeasure,
    BabbageModel,
    DimensionSpec,
    FieldTranslator,
    Hierarchy,
    Mapping,
    MeasureSpec,
    PrimaryKey,
    TranslatedField,
};

// =============================================================================
// Re-exports - Naming
// =============================================================================

pub use naming::{database_name, slugify, NameAllocator, NameKind};

// =============================================================================
// Re-exports - Builder
// =============================================================================

pub use transform::{build, fdp_to_model, LabelResolver};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use package::{
    field_translator_from_json, load_field_translator, BuildTarget, DataPackage, Resource,
};
