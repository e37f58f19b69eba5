//! Closure and reduction of feature selections
//!
//! [`Resolver::expand`] computes everything a selection pulls in, in
//! dependency-first order. [`Resolver::reduce`] computes the smallest
//! subset of a selection with the same closure. Both fail fast on the first
//! cycle, unknown feature or exclusion conflict.

use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use super::feature::Catalog;
use super::graph::{InclusionGraph, Traversal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("feature {0} does not exist")]
    UnknownFeature(String),

    #[error("{0} is part of a loop")]
    CycleDetected(String),

    #[error("{0} has been excluded by another feature")]
    ExclusionConflict(String),

    #[error("must have a platform")]
    MissingPlatform,

    #[error("cannot have multiple platforms: {0} and {1}")]
    MultiplePlatforms(String, String),
}

/// Result of expanding a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// The closure, dependencies before dependents
    pub features: Vec<String>,

    /// Ignored features that were reached, in the order first encountered
    pub ignored: Vec<String>,
}

impl Expansion {
    /// Returns the encountered ignored features, alphabetically
    pub fn ignored_sorted(&self) -> Vec<String> {
        let mut ignored = self.ignored.clone();
        ignored.sort();
        ignored
    }
}

/// Resolves selections against a catalog
pub struct Resolver<'c> {
    catalog: &'c Catalog,
    graph: InclusionGraph,
}

impl<'c> Resolver<'c> {
    /// Creates a resolver, building the inclusion graph once
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            graph: InclusionGraph::from_catalog(catalog),
        }
    }

    /// Returns the catalog
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Expands a selection to its full closure
    ///
    /// One traversal is shared by all roots, so overlapping roots are
    /// deduplicated. Excludes are collected across every root: a feature
    /// excluded by one root conflicts with the same feature reached from
    /// another.
    pub fn expand<S: AsRef<str>>(
        &self,
        selection: &[S],
        ignored: &BTreeSet<String>,
    ) -> Result<Expansion, ResolveError> {
        let mut traversal = Traversal::new(&self.graph);
        let mut expansion = Expansion::default();
        let mut forbidden: HashSet<&str> = HashSet::new();

        for root in selection {
            traversal.postorder(
                root.as_ref(),
                |v| {
                    if ignored.contains(v) {
                        expansion.ignored.push(v.to_string());
                        false
                    } else {
                        true
                    }
                },
                |v| {
                    expansion.features.push(v.to_string());
                    if let Some(feature) = self.catalog.get(v) {
                        forbidden.extend(feature.excludes.iter().map(String::as_str));
                    }
                },
            )?;
        }

        if let Some(excluded) = expansion
            .features
            .iter()
            .find(|f| forbidden.contains(f.as_str()))
        {
            return Err(ResolveError::ExclusionConflict(excluded.clone()));
        }

        Ok(expansion)
    }

    /// Reduces a selection to a minimal subset with the same closure
    ///
    /// Entries are scanned left to right. Each surviving entry claims every
    /// later entry it reaches and evicts every earlier one, so the first
    /// occurrence in input order wins. The selection itself is not modified.
    /// The result keeps first-occurrence order but callers should sort it.
    pub fn reduce<S: AsRef<str>>(
        &self,
        selection: &[S],
        ignored: &BTreeSet<String>,
    ) -> Result<Vec<String>, ResolveError> {
        let mut claimed = vec![false; selection.len()];
        let mut minimal: Vec<String> = Vec::new();
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut forbidden: HashSet<&str> = HashSet::new();

        for (i, root) in selection.iter().enumerate() {
            let root = root.as_ref();
            if claimed[i] || ignored.contains(root) {
                continue;
            }

            if !minimal.iter().any(|m| m.as_str() == root) {
                minimal.push(root.to_string());
            }

            Traversal::new(&self.graph).postorder(
                root,
                |v| !ignored.contains(v),
                |v| {
                    if v == root {
                        return;
                    }

                    for (j, later) in selection.iter().enumerate().skip(i + 1) {
                        if later.as_ref() == v {
                            claimed[j] = true;
                        }
                    }

                    minimal.retain(|m| m.as_str() != v);
                    visited.insert(v);

                    if let Some(feature) = self.catalog.get(v) {
                        forbidden.extend(feature.excludes.iter().map(String::as_str));
                    }
                },
            )?;
        }

        if let Some(excluded) = visited.iter().find(|f| forbidden.contains(**f)) {
            return Err(ResolveError::ExclusionConflict(excluded.to_string()));
        }

        Ok(minimal)
    }
}
