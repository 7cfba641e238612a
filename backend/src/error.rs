//! Error types for the FDP to Babbage conversion.
//!
//! - [`ModelError`] - failures of the model builder itself
//! - [`PackageError`] - failures loading a descriptor or a field translator
//! - [`ConvertError`] - top-level error of [`crate::fdp_to_model`]
//!
//! Lower-level errors convert into [`ConvertError`] via `From`, so `?` works
//! across the boundary.

use thiserror::Error;

// =============================================================================
// Model Builder Errors
// =============================================================================

/// Errors raised while building a Babbage model from an FDP mapping.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A `source` field key has no entry in the field translator.
    #[error("Unresolved field '{field}' referenced by {context}")]
    UnresolvedField { field: String, context: String },

    /// A primary key part or a label points at an undeclared attribute.
    #[error("Dimension '{dimension}' has no attribute '{attribute}'")]
    UnknownAttribute { dimension: String, attribute: String },
}

// =============================================================================
// Package Loading Errors
// =============================================================================

/// Errors reading a datapackage descriptor or a field translator.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON or a missing required key.
    #[error("Invalid descriptor: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The package declares no mapping.
    #[error("Datapackage has no 'mapping' (or 'model') section")]
    NoMapping,

    /// The package declares no resources.
    #[error("Datapackage has no resources")]
    NoResources,

    /// The requested resource is not part of the package.
    #[error("Resource not found in datapackage: {0}")]
    UnknownResource(String),
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion error.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for model building.
pub type ModelResult<T> = Result<T, ModelError>;

/// Result type for package loading.
pub type PackageResult<T> = Result<T, PackageError>;

/// Result type for end-to-end conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;
