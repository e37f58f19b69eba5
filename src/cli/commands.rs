//! Feature commands (cname, features, elements, flags, platform, ignore, params)
//!
//! Each command is a short pipeline over the resolver. Ignored features that
//! a traversal reaches are reported as warnings before anything is printed.

use std::collections::BTreeSet;

use anyhow::{Context, Result};

use super::output::Output;
use super::shell::render_shell_vars;
use crate::domain::{
    cherry_pick, filter_by_type, merge_features, sort_features, Catalog, Expansion, FeatureType,
    Resolver,
};

/// What a command operates on
pub struct Request {
    /// All known features
    pub catalog: Catalog,

    /// The user's selection, in the order given
    pub features: Vec<String>,

    /// Features to skip during traversal
    pub ignored: BTreeSet<String>,
}

fn report_ignored(output: &Output, expansion: &Expansion) {
    for name in &expansion.ignored {
        output.warn(&format!("{} is being ignored", name));
    }
}

/// Expands the selection with platform roots first and validates the result
fn closure(request: &Request, output: &Output) -> Result<Vec<String>> {
    let resolver = Resolver::new(&request.catalog);

    let roots = sort_features(&request.catalog, &request.features, false, false)?;
    output.verbose_ctx("expand", &format!("Roots: {}", roots.join(",")));

    let expansion = resolver.expand(&roots, &request.ignored)?;
    report_ignored(output, &expansion);
    output.verbose_ctx("expand", &format!("Expanded to {} features", expansion.features.len()));
    for name in &expansion.features {
        let description = request.catalog.get(name).and_then(|f| f.description.as_deref());
        if let Some(description) = description {
            output.verbose_ctx("expand", &format!("{}: {}", name, description));
        }
    }

    sort_features(&request.catalog, &expansion.features, false, true)?;
    Ok(expansion.features)
}

/// Effective minimum of the selection, as a canonical name
pub fn cname(request: &Request, output: &Output) -> Result<()> {
    let resolver = Resolver::new(&request.catalog);
    let cname = resolver
        .cname(&request.features, &request.ignored)
        .context("cname")?;

    report_ignored(output, &cname.expansion);
    output.verbose_ctx("cname", &format!("Minimal features: {}", cname.features.join(",")));
    output.value(&cname.name).context("cname")
}

/// Effective maximum of the selection, dependencies first
pub fn features(request: &Request, output: &Output) -> Result<()> {
    let features = closure(request, output).context("features")?;
    output.list(&features).context("features")
}

/// Platform and element features of the closure
pub fn elements(request: &Request, output: &Output) -> Result<()> {
    let features = closure(request, output).context("elements")?;
    let elements = filter_by_type(
        &request.catalog,
        &features,
        &[FeatureType::Platform, FeatureType::Element],
    )
    .context("elements")?;
    output.list(&elements).context("elements")
}

/// Flag features of the closure
pub fn flags(request: &Request, output: &Output) -> Result<()> {
    let features = closure(request, output).context("flags")?;
    let flags =
        filter_by_type(&request.catalog, &features, &[FeatureType::Flag]).context("flags")?;
    output.list(&flags).context("flags")
}

/// The single platform of the closure
pub fn platform(request: &Request, output: &Output) -> Result<()> {
    let resolver = Resolver::new(&request.catalog);
    let expansion = resolver
        .expand(&request.features, &request.ignored)
        .context("platform")?;
    report_ignored(output, &expansion);

    let sorted =
        sort_features(&request.catalog, &expansion.features, false, true).context("platform")?;
    // validation guarantees exactly one platform, sorted first
    match sorted.first() {
        Some(platform) => output.value(platform).context("platform"),
        None => Ok(()),
    }
}

/// Ignored features that the closure actually reached
pub fn ignore(request: &Request, output: &Output) -> Result<()> {
    let resolver = Resolver::new(&request.catalog);
    let expansion = resolver
        .expand(&request.features, &request.ignored)
        .context("ignore")?;
    report_ignored(output, &expansion);

    sort_features(&request.catalog, &expansion.features, false, true).context("ignore")?;
    output.list(&expansion.ignored_sorted()).context("ignore")
}

/// Merged parameters of the closure, as shell assignments
pub fn params(request: &Request, output: &Output, paths: &[String]) -> Result<()> {
    let features = closure(request, output).context("params")?;

    let mut tree = merge_features(&request.catalog, &features).context("params")?;
    if !paths.is_empty() {
        output.verbose_ctx("params", &format!("Selecting paths: {}", paths.join(",")));
        tree = cherry_pick(&tree, paths).context("params")?;
    }

    if output.is_json() {
        output.data(&tree).context("params")
    } else {
        output.lines(&render_shell_vars(&tree).context("params")?);
        Ok(())
    }
}
