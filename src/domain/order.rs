//! Classification and ordering of feature lists
//!
//! Features are partitioned into platforms, other features and flags, in
//! that order. Input order is kept within each class unless strict ordering
//! is requested.

use super::feature::{Catalog, FeatureType};
use super::resolve::ResolveError;

/// Sorts features into platform, other and flag classes
///
/// With `validate_platform`, exactly one platform entry must be present.
/// With `strict`, every class is additionally sorted by byte order.
pub fn sort_features<S: AsRef<str>>(
    catalog: &Catalog,
    features: &[S],
    strict: bool,
    validate_platform: bool,
) -> Result<Vec<String>, ResolveError> {
    let mut platforms: Vec<String> = Vec::new();
    let mut others: Vec<String> = Vec::new();
    let mut flags: Vec<String> = Vec::new();

    for name in features {
        let name = name.as_ref();
        match catalog.feature(name)?.kind {
            FeatureType::Platform => {
                if validate_platform {
                    if let Some(first) = platforms.first() {
                        return Err(ResolveError::MultiplePlatforms(
                            first.clone(),
                            name.to_string(),
                        ));
                    }
                }
                platforms.push(name.to_string());
            }
            FeatureType::Flag => flags.push(name.to_string()),
            FeatureType::Element => others.push(name.to_string()),
        }
    }

    if validate_platform && platforms.is_empty() {
        return Err(ResolveError::MissingPlatform);
    }

    if strict {
        platforms.sort();
        others.sort();
        flags.sort();
    }

    platforms.extend(others);
    platforms.extend(flags);
    Ok(platforms)
}

/// Keeps the features whose type is one of `kinds`, preserving order
pub fn filter_by_type<S: AsRef<str>>(
    catalog: &Catalog,
    features: &[S],
    kinds: &[FeatureType],
) -> Result<Vec<String>, ResolveError> {
    let mut matching = Vec::new();

    for name in features {
        let name = name.as_ref();
        if kinds.contains(&catalog.feature(name)?.kind) {
            matching.push(name.to_string());
        }
    }

    Ok(matching)
}
