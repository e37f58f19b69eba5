//! garden-feat - Feature-graph resolver for operating-system image builds
//!
//! Builds are composed from named features (platforms, elements, flags)
//! that include and exclude each other. This crate computes the closure of
//! a selection, checks it for cycles and exclusion conflicts, reduces it to
//! the smallest equivalent selection and derives the canonical build name.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Catalog, Expansion, Feature, FeatureType, Resolver, ResolveError};
