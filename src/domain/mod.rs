//! Domain models for garden-feat
//!
//! Contains the feature-graph resolution engine without any I/O concerns.

mod feature;
mod graph;
mod resolve;
mod order;
mod cname;
mod merge;

pub use feature::{Catalog, Feature, FeatureType};
pub use graph::{InclusionGraph, Traversal};
pub use resolve::{Expansion, Resolver, ResolveError};
pub use order::{filter_by_type, sort_features};
pub use cname::{format_cname, CanonicalName};
pub use merge::{
    cherry_pick, entry_name, merge_documents, merge_features, scalar_text, ParamsError,
    RESERVED_KEYS,
};
