use log::info;

use crate::config::{MatchConfig, ReconConfig};
use crate::error::ReconError;
use crate::matcher;
use crate::model::{AttributeMatch, Catalog, CategoryMatch, ReconResult, ReconSummary, ValueMatch};

/// Align two catalogs per a run file. Returns all matches + summary.
pub fn run(
    config: &ReconConfig,
    source: &Catalog,
    target: &Catalog,
) -> Result<ReconResult, ReconError> {
    let matcher = Matcher::with_config(config.matching)?;
    info!(
        "run '{}': '{}' -> '{}' at threshold {}",
        config.name,
        source.name,
        target.name,
        config.threshold()
    );
    Ok(matcher.match_all(source, target))
}

/// Validated matching entry point.
///
/// Holds only configuration. Stages that depend on earlier stages compute
/// them within the call, so one `Matcher` can serve concurrent callers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(similarity_threshold: f64) -> Result<Self, ReconError> {
        Ok(Self { config: MatchConfig::new(similarity_threshold)? })
    }

    pub fn with_config(config: MatchConfig) -> Result<Self, ReconError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn threshold(&self) -> f64 {
        self.config.similarity_threshold()
    }

    pub fn match_categories(&self, source: &Catalog, target: &Catalog) -> Vec<CategoryMatch> {
        matcher::match_categories(source, target, &self.config)
    }

    pub fn match_attributes(&self, source: &Catalog, target: &Catalog) -> Vec<AttributeMatch> {
        let categories = self.match_categories(source, target);
        matcher::match_attributes(source, target, &categories, &self.config)
    }

    pub fn match_list_of_values(&self, source: &Catalog, target: &Catalog) -> Vec<ValueMatch> {
        self.match_all(source, target).lov_matches
    }

    /// Category, then attribute, then value stage over the same catalog pair.
    pub fn match_all(&self, source: &Catalog, target: &Catalog) -> ReconResult {
        let category_matches = matcher::match_categories(source, target, &self.config);
        let attribute_matches =
            matcher::match_attributes(source, target, &category_matches, &self.config);
        let lov_matches =
            matcher::match_list_of_values(source, target, &attribute_matches, &self.config);

        let summary = compute_summary(&category_matches, &attribute_matches, &lov_matches);
        ReconResult {
            category_matches,
            attribute_matches,
            lov_matches,
            summary,
        }
    }
}

pub fn compute_summary(
    categories: &[CategoryMatch],
    attributes: &[AttributeMatch],
    values: &[ValueMatch],
) -> ReconSummary {
    ReconSummary {
        total_category_matches: categories.len(),
        total_attribute_matches: attributes.len(),
        total_lov_matches: values.len(),
    }
}
