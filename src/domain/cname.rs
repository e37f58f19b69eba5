//! Canonical build names
//!
//! A canonical name joins a reduced, strictly sorted feature list with
//! hyphens, except that flags fuse onto the preceding token:
//! `kvm-gardener_prod`. Downstream build tooling matches on this format.

use std::collections::BTreeSet;

use super::feature::Catalog;
use super::order::sort_features;
use super::resolve::{Expansion, ResolveError, Resolver};

/// A canonical name together with what it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalName {
    /// The formatted name
    pub name: String,

    /// The reduced, strictly sorted features the name is made of
    pub features: Vec<String>,

    /// The validated closure of the selection
    pub expansion: Expansion,
}

impl std::fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Formats an already reduced and strictly sorted feature list
pub fn format_cname<S: AsRef<str>>(
    catalog: &Catalog,
    features: &[S],
) -> Result<String, ResolveError> {
    let mut cname = String::new();

    for (i, name) in features.iter().enumerate() {
        let name = name.as_ref();
        if !catalog.feature(name)?.kind.is_flag() && i > 0 {
            cname.push('-');
        }
        cname.push_str(name);
    }

    Ok(cname)
}

impl Resolver<'_> {
    /// Computes the canonical name of a selection
    ///
    /// The full closure is validated first (conflicts, exactly one platform),
    /// then the selection is reduced and strictly sorted before formatting.
    pub fn cname<S: AsRef<str>>(
        &self,
        selection: &[S],
        ignored: &BTreeSet<String>,
    ) -> Result<CanonicalName, ResolveError> {
        let expansion = self.expand(selection, ignored)?;
        sort_features(self.catalog(), &expansion.features, false, true)?;

        let minimal = self.reduce(selection, ignored)?;
        let features = sort_features(self.catalog(), &minimal, true, false)?;
        let name = format_cname(self.catalog(), &features)?;

        Ok(CanonicalName {
            name,
            features,
            expansion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::{Feature, FeatureType};

    fn none() -> BTreeSet<String> {
        BTreeSet::new()
    }

    #[test]
    fn flags_fuse_onto_previous_token() {
        let catalog: Catalog = [
            ("p", Feature::new(FeatureType::Platform)),
            ("e", Feature::new(FeatureType::Element)),
            ("g", Feature::new(FeatureType::Flag)),
        ]
        .into_iter()
        .collect();

        assert_eq!(format_cname(&catalog, &["p", "e", "g"]).unwrap(), "p-eg");
    }

    #[test]
    fn leading_flag_has_no_separator() {
        let catalog: Catalog = [
            ("_a", Feature::new(FeatureType::Flag)),
            ("e", Feature::new(FeatureType::Element)),
        ]
        .into_iter()
        .collect();

        assert_eq!(format_cname(&catalog, &["_a", "e"]).unwrap(), "_a-e");
        assert_eq!(format_cname(&catalog, &["e"]).unwrap(), "e");
    }

    #[test]
    fn empty_list_is_empty_name() {
        let empty: [&str; 0] = [];
        assert_eq!(format_cname(&Catalog::new(), &empty).unwrap(), "");
    }

    #[test]
    fn unknown_feature_rejected() {
        assert_eq!(
            format_cname(&Catalog::new(), &["ghost"]),
            Err(ResolveError::UnknownFeature("ghost".to_string()))
        );
    }

    #[test]
    fn resolver_cname_literal_case() {
        let catalog: Catalog = [
            ("p", Feature::new(FeatureType::Platform)),
            ("e", Feature::new(FeatureType::Element)),
            ("g", Feature::new(FeatureType::Flag)),
        ]
        .into_iter()
        .collect();
        let resolver = Resolver::new(&catalog);

        let cname = resolver.cname(&["p", "e", "g"], &none()).unwrap();
        assert_eq!(cname.name, "p-eg");
        assert_eq!(cname.features, vec!["p", "e", "g"]);
        assert_eq!(cname.to_string(), "p-eg");

        assert_eq!(resolver.cname(&["g", "e", "p"], &none()).unwrap().name, "p-eg");
    }

    #[test]
    fn resolver_cname_reduces_and_sorts() {
        let catalog: Catalog = [
            ("kvm", Feature::new(FeatureType::Platform)),
            ("base", Feature::new(FeatureType::Element)),
            ("server", Feature::new(FeatureType::Element).including(["base"])),
            ("gardener", Feature::new(FeatureType::Element).including(["server"])),
            ("_prod", Feature::new(FeatureType::Flag)),
            ("_fips", Feature::new(FeatureType::Flag)),
        ]
        .into_iter()
        .collect();
        let resolver = Resolver::new(&catalog);

        let cname = resolver
            .cname(&["_prod", "base", "gardener", "kvm", "_fips", "server"], &none())
            .unwrap();
        assert_eq!(cname.name, "kvm-gardener_fips_prod");
        assert_eq!(cname.expansion.features.len(), 6);
    }

    #[test]
    fn resolver_cname_requires_platform() {
        let catalog: Catalog = [("base", Feature::new(FeatureType::Element))].into_iter().collect();
        let resolver = Resolver::new(&catalog);

        assert_eq!(resolver.cname(&["base"], &none()), Err(ResolveError::MissingPlatform));
    }

    #[test]
    fn resolver_cname_keeps_ignored_report() {
        let catalog: Catalog = [
            ("kvm", Feature::new(FeatureType::Platform).including(["cloud"])),
            ("cloud", Feature::new(FeatureType::Element)),
            ("server", Feature::new(FeatureType::Element)),
        ]
        .into_iter()
        .collect();
        let resolver = Resolver::new(&catalog);
        let ignored: BTreeSet<String> = ["cloud".to_string()].into_iter().collect();

        let cname = resolver.cname(&["kvm", "server"], &ignored).unwrap();
        assert_eq!(cname.name, "kvm-server");
        assert_eq!(cname.expansion.ignored, vec!["cloud"]);
    }
}
