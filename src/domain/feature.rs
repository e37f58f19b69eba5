//! Feature domain model
//!
//! A feature is a named configuration unit with a type, an ordered list of
//! features it includes and a list of features it cannot coexist with.
//! The [`Catalog`] maps names to features and is read-only during resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::resolve::ResolveError;

/// Type of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// The target platform; exactly one per valid build
    Platform,

    /// A regular build element
    Element,

    /// A modifier that fuses onto the preceding token in canonical names
    Flag,
}

impl FeatureType {
    /// Returns all valid feature types
    pub fn all() -> &'static [FeatureType] {
        &[FeatureType::Platform, FeatureType::Element, FeatureType::Flag]
    }

    /// Returns true for flags
    pub fn is_flag(&self) -> bool {
        matches!(self, FeatureType::Flag)
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureType::Platform => write!(f, "platform"),
            FeatureType::Element => write!(f, "element"),
            FeatureType::Flag => write!(f, "flag"),
        }
    }
}

impl std::str::FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform" => Ok(FeatureType::Platform),
            "element" => Ok(FeatureType::Element),
            "flag" => Ok(FeatureType::Flag),
            _ => Err(format!("Unknown feature type: {}", s)),
        }
    }
}

/// A feature record as supplied by the loader
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature type
    pub kind: FeatureType,

    /// Human readable description
    pub description: Option<String>,

    /// Features pulled in by this one, in declared order
    pub includes: Vec<String>,

    /// Features that must never appear alongside this one
    pub excludes: Vec<String>,

    /// The full descriptor document, consumed by the parameter merge
    pub document: serde_yaml::Value,
}

impl Feature {
    /// Creates a feature with no relations
    pub fn new(kind: FeatureType) -> Self {
        Self {
            kind,
            description: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            document: serde_yaml::Value::Null,
        }
    }

    /// Adds included features (builder style)
    pub fn including<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds excluded features (builder style)
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches the raw descriptor document (builder style)
    pub fn with_document(mut self, document: serde_yaml::Value) -> Self {
        self.document = document;
        self
    }
}

/// Immutable mapping of feature name to feature record
///
/// Names iterate in lexicographic order so everything derived from the
/// catalog is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    features: BTreeMap<String, Feature>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a feature
    pub fn insert(&mut self, name: impl Into<String>, feature: Feature) {
        self.features.insert(name.into(), feature);
    }

    /// Looks up a feature
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.get(name)
    }

    /// Looks up a feature, failing with [`ResolveError::UnknownFeature`]
    pub fn feature(&self, name: &str) -> Result<&Feature, ResolveError> {
        self.features
            .get(name)
            .ok_or_else(|| ResolveError::UnknownFeature(name.to_string()))
    }

    /// Returns true if the catalog defines the feature
    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Returns the number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates features in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Feature)> {
        self.features.iter().map(|(name, feature)| (name.as_str(), feature))
    }
}

impl<S: Into<String>> FromIterator<(S, Feature)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (S, Feature)>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().map(|(name, f)| (name.into(), f)).collect(),
        }
    }
}
