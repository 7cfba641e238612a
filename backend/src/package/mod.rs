//! Loading Fiscal DataPackage descriptors and field translators.
//!
//! The model builder itself never touches the filesystem; these helpers are
//! the edge used by the CLI to get its inputs into memory.
//!
//! Both the early `mapping` key and the later `model` key are accepted for
//! the measures/dimensions block of a descriptor.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{PackageError, PackageResult};
use crate::models::{FieldTranslator, Mapping};
use crate::naming::{NameAllocator, NameKind};

/// A Fiscal DataPackage descriptor (`datapackage.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataPackage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default, alias = "model", skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Mapping>,
}

/// A tabular resource of the package. Only its identity matters here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
}

/// Resource to build and the fact table its model points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub resource: String,
    pub table: String,
}

impl DataPackage {
    /// Parse a descriptor from a JSON string.
    pub fn from_json(content: &str) -> PackageResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a descriptor file.
    pub fn from_file(path: impl AsRef<Path>) -> PackageResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading datapackage");
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The measures/dimensions mapping.
    pub fn mapping(&self) -> PackageResult<&Mapping> {
        self.mapping.as_ref().ok_or(PackageError::NoMapping)
    }

    /// Resource named `name`, or the first resource when `name` is `None`.
    pub fn resource(&self, name: Option<&str>) -> PackageResult<&Resource> {
        match name {
            Some(name) => self
                .resources
                .iter()
                .find(|r| r.name == name)
                .ok_or_else(|| PackageError::UnknownResource(name.to_string())),
            None => self.resources.first().ok_or(PackageError::NoResources),
        }
    }

    /// Pick the resource to build and its fact table.
    ///
    /// Defaults to the first resource, and to a table named after the
    /// resource's storage-safe name.
    pub fn target(&self, resource: Option<&str>, table: Option<&str>) -> PackageResult<BuildTarget> {
        let resource = self.resource(resource)?;
        let table = match table {
            Some(table) => table.to_string(),
            None => NameAllocator::new(NameKind::Table).allocate(&resource.name),
        };
        Ok(BuildTarget {
            resource: resource.name.clone(),
            table,
        })
    }
}

/// Parse a field translator (`{key: {name, type}}`) from a JSON string.
pub fn field_translator_from_json(content: &str) -> PackageResult<FieldTranslator> {
    Ok(serde_json::from_str(content)?)
}

/// Read and parse a field translator file.
pub fn load_field_translator(path: impl AsRef<Path>) -> PackageResult<FieldTranslator> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading field translator");
    let content = std::fs::read_to_string(path)?;
    field_translator_from_json(&content)
}
