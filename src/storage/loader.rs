//! Feature directory loading
//!
//! Features live in a flat directory. A feature is either a subdirectory
//! holding an `info.yaml` descriptor, named after the directory, or a
//! top-level `*.yaml` file, named after the file stem:
//!
//! ```text
//! features/
//! ├── base/
//! │   └── info.yaml
//! ├── kvm/
//! │   └── info.yaml
//! └── _prod.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Catalog, Feature, FeatureType};

/// Name of the descriptor file inside a feature directory
pub const DESCRIPTOR_FILE: &str = "info.yaml";

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("feature {feature} has unsupported type {kind}")]
    UnsupportedType { feature: String, kind: String },

    #[error("Feature directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// On-disk shape of a feature descriptor
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Descriptor {
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    features: Option<Relations>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Relations {
    include: Vec<String>,
    exclude: Vec<String>,
}

/// Reads feature descriptors from a directory
pub struct FeatureStore {
    /// Directory containing the features
    dir: PathBuf,
}

impl FeatureStore {
    /// Creates a store for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Lists `(name, descriptor path)` pairs, sorted by name
    pub fn discover(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.dir.is_dir() {
            return Err(LoadError::MissingDirectory(self.dir.clone()).into());
        }

        let mut found = Vec::new();

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory: {}", self.dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if path.is_dir() {
                let descriptor = path.join(DESCRIPTOR_FILE);
                if descriptor.is_file() {
                    found.push((file_name.to_string(), descriptor));
                }
            } else if let Some(stem) = file_name.strip_suffix(".yaml") {
                found.push((stem.to_string(), path.clone()));
            }
        }

        found.sort();
        Ok(found)
    }

    /// Loads every feature into a catalog
    pub fn load(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();

        for (name, path) in self.discover()? {
            let feature = Self::read_feature(&name, &path)?;
            catalog.insert(name, feature);
        }

        Ok(catalog)
    }

    /// Reads a single descriptor file
    fn read_feature(name: &str, path: &Path) -> Result<Feature> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature: {}", path.display()))?;

        parse_feature(name, &content)
            .with_context(|| format!("Failed to parse feature: {}", path.display()))
    }
}

/// Parses descriptor text into a feature record
pub fn parse_feature(name: &str, content: &str) -> Result<Feature> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;
    let descriptor: Descriptor = if document.is_null() {
        Descriptor::default()
    } else {
        serde_yaml::from_value(document.clone())?
    };

    let kind_text = descriptor.kind.unwrap_or_default();
    let kind: FeatureType = kind_text.parse().map_err(|_| LoadError::UnsupportedType {
        feature: name.to_string(),
        kind: kind_text.clone(),
    })?;

    let relations = descriptor.features.unwrap_or_default();
    let mut feature = Feature::new(kind)
        .including(relations.include)
        .excluding(relations.exclude)
        .with_document(document);
    feature.description = descriptor.description;

    Ok(feature)
}
