//! The three matching stages.
//!
//! Each stage takes the previous stage's output explicitly, so a category
//! pair that was never matched gates out every attribute and value beneath
//! it. Selection is greedy per source entity: the highest scoring target at
//! or above the threshold wins, the first one seen wins ties, and targets are
//! not reserved, so two sources may pick the same target.
//!
//! Cost is quadratic at every level: categories x categories, then
//! attributes x attributes per matched category pair, then values x values
//! per matched attribute pair. Catalogs with tens of thousands of categories
//! need a blocking/indexing pass in front of this.

use log::{debug, trace};

use crate::config::{MatchConfig, CATEGORY_NAME_WEIGHT, CATEGORY_PATH_WEIGHT};
use crate::model::{
    AttributeMatch, AttributeRef, Catalog, CategoryMatch, CategoryRef, MatchKind, ScoredMatch,
    ValueMatch, ValueRef,
};
use crate::normalize::normalize_value;
use crate::similarity::score;

/// Index and score of the highest scoring target with `score >= threshold`.
/// Only a strictly higher score replaces the current best, and a score of 0
/// never matches.
pub fn best_match<T>(
    targets: &[T],
    threshold: f64,
    mut score_of: impl FnMut(&T) -> f64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = 0.0;
    for (idx, target) in targets.iter().enumerate() {
        let s = score_of(target);
        if s > best_score && s >= threshold {
            best_score = s;
            best = Some((idx, s));
        }
    }
    best
}

fn scored(
    source: &Catalog,
    target: &Catalog,
    similarity_score: f64,
    kind: MatchKind,
) -> ScoredMatch {
    ScoredMatch {
        source_catalog_name: source.name.clone(),
        target_catalog_name: target.name.clone(),
        similarity_score,
        kind,
    }
}

/// Blend of name and path similarity used to compare two categories.
pub fn category_score(
    source_name: &str,
    source_path: &str,
    target_name: &str,
    target_path: &str,
) -> f64 {
    let blended = score(source_name, target_name) * CATEGORY_NAME_WEIGHT
        + score(source_path, target_path) * CATEGORY_PATH_WEIGHT;
    blended.min(1.0)
}

/// Pair every source category with its best target category.
pub fn match_categories(
    source: &Catalog,
    target: &Catalog,
    config: &MatchConfig,
) -> Vec<CategoryMatch> {
    let threshold = config.similarity_threshold();
    let mut matches = Vec::new();

    for src in &source.categories {
        let best = best_match(&target.categories, threshold, |tgt| {
            category_score(&src.name, &src.path, &tgt.name, &tgt.path)
        });
        if let Some((ti, s)) = best {
            let tgt = &target.categories[ti];
            trace!("category '{}' -> '{}' ({s:.3})", src.name, tgt.name);
            matches.push(CategoryMatch {
                scored: scored(source, target, s, MatchKind::Category),
                source_category: CategoryRef::from(src),
                target_category: CategoryRef::from(tgt),
            });
        }
    }

    debug!(
        "category stage: {} x {} compared, {} matched (threshold {threshold})",
        source.categories.len(),
        target.categories.len(),
        matches.len(),
    );
    matches
}

/// Pair attributes inside each matched category pair, by name similarity.
pub fn match_attributes(
    source: &Catalog,
    target: &Catalog,
    category_matches: &[CategoryMatch],
    config: &MatchConfig,
) -> Vec<AttributeMatch> {
    let threshold = config.similarity_threshold();
    let mut matches = Vec::new();

    for cat_match in category_matches {
        let (Some(src_cat), Some(tgt_cat)) = (
            source.category(&cat_match.source_category.id),
            target.category(&cat_match.target_category.id),
        ) else {
            debug!(
                "category pair '{}' <-> '{}' not found in catalogs, skipped",
                cat_match.source_category.id, cat_match.target_category.id,
            );
            continue;
        };

        for src in &src_cat.attributes {
            let best =
                best_match(&tgt_cat.attributes, threshold, |tgt| score(&src.name, &tgt.name));
            if let Some((ti, s)) = best {
                let tgt = &tgt_cat.attributes[ti];
                trace!(
                    "attribute '{}' -> '{}' in '{}' ({s:.3})",
                    src.name,
                    tgt.name,
                    src_cat.name
                );
                matches.push(AttributeMatch {
                    scored: scored(source, target, s, MatchKind::Attribute),
                    source_category_name: cat_match.source_category.name.clone(),
                    target_category_name: cat_match.target_category.name.clone(),
                    source_attribute: AttributeRef::from(src),
                    target_attribute: AttributeRef::from(tgt),
                });
            }
        }
    }

    debug!(
        "attribute stage: {} category pairs, {} matched (threshold {threshold})",
        category_matches.len(),
        matches.len(),
    );
    matches
}

/// Pair LOV entries inside each matched attribute pair, comparing normalized
/// literals.
pub fn match_list_of_values(
    source: &Catalog,
    target: &Catalog,
    attribute_matches: &[AttributeMatch],
    config: &MatchConfig,
) -> Vec<ValueMatch> {
    let threshold = config.similarity_threshold();
    let mut matches = Vec::new();

    for attr_match in attribute_matches {
        // Attribute ids resolve catalog-wide, first occurrence wins.
        let (Some(src_attr), Some(tgt_attr)) = (
            source.attribute(&attr_match.source_attribute.id),
            target.attribute(&attr_match.target_attribute.id),
        ) else {
            debug!(
                "attribute pair '{}' <-> '{}' not found in catalogs, skipped",
                attr_match.source_attribute.id, attr_match.target_attribute.id,
            );
            continue;
        };

        let target_norms: Vec<String> = tgt_attr
            .values
            .iter()
            .map(|v| normalize_value(&v.literal))
            .collect();

        for src in &src_attr.values {
            let src_norm = normalize_value(&src.literal);
            let best = best_match(&target_norms, threshold, |tgt_norm| score(&src_norm, tgt_norm));
            if let Some((ti, s)) = best {
                let tgt = &tgt_attr.values[ti];
                trace!("value '{}' -> '{}' ({s:.3})", src.literal, tgt.literal);
                matches.push(ValueMatch {
                    scored: scored(source, target, s, MatchKind::ListOfValues),
                    source_category_name: attr_match.source_category_name.clone(),
                    target_category_name: attr_match.target_category_name.clone(),
                    source_attribute_name: attr_match.source_attribute.name.clone(),
                    target_attribute_name: attr_match.target_attribute.name.clone(),
                    source_value: ValueRef::from(src),
                    target_value: ValueRef::from(tgt),
                });
            }
        }
    }

    debug!(
        "value stage: {} attribute pairs, {} matched (threshold {threshold})",
        attribute_matches.len(),
        matches.len(),
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, Category, Value};

    fn cfg(threshold: f64) -> MatchConfig {
        MatchConfig::new(threshold).unwrap()
    }

    fn value(literal: &str) -> Value {
        Value { literal: literal.into(), id: literal.to_lowercase().replace(' ', "_") }
    }

    fn attr(id: &str, name: &str, values: &[&str]) -> Attribute {
        Attribute {
            id: id.into(),
            name: name.into(),
            attribute_type: "enum".into(),
            required: true,
            values: values.iter().map(|v| value(v)).collect(),
        }
    }

    fn cat(id: &str, name: &str, path: &str, attributes: Vec<Attribute>) -> Category {
        Category { id: id.into(), name: name.into(), path: path.into(), attributes }
    }

    fn catalog(name: &str, categories: Vec<Category>) -> Catalog {
        Catalog { name: name.into(), id: None, categories }
    }

    fn books_pair() -> (Catalog, Catalog) {
        let a = catalog(
            "Marketplace A",
            vec![cat(
                "cat_a_1",
                "Books",
                "Books",
                vec![attr("attr_a_1", "Author", &["Fiction", "Non-Fiction"])],
            )],
        );
        let b = catalog(
            "Marketplace B",
            vec![cat(
                "cat_b_1",
                "Book Store",
                "Books",
                vec![attr("attr_b_1", "Writer", &["Fiction", "Non Fiction"])],
            )],
        );
        (a, b)
    }

    #[test]
    fn best_match_prefers_first_on_ties() {
        let scores = [0.4, 0.8, 0.8, 0.7];
        assert_eq!(best_match(&scores, 0.5, |s| *s), Some((1, 0.8)));
    }

    #[test]
    fn best_match_requires_threshold() {
        let scores = [0.4, 0.59];
        assert_eq!(best_match(&scores, 0.6, |s| *s), None);
        assert_eq!(best_match(&scores, 0.59, |s| *s), Some((1, 0.59)));
    }

    #[test]
    fn zero_score_never_matches() {
        let scores = [0.0, 0.0];
        assert_eq!(best_match(&scores, 0.0, |s| *s), None);
    }

    #[test]
    fn mobile_phones_category() {
        let a = catalog("A", vec![cat("a1", "Mobile Phones", "Electronics/Mobile Phones", vec![])]);
        let b = catalog("B", vec![cat("b1", "Mobile Phone", "Electronics/Mobiles", vec![])]);
        let matches = match_categories(&a, &b, &cfg(0.6));
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert!(m.scored.similarity_score >= 0.6);
        assert!((m.scored.similarity_score - (0.96 * 0.7 + 38.0 / 44.0 * 0.3)).abs() < 1e-9);
        assert_eq!(m.source_category.id, "a1");
        assert_eq!(m.target_category.id, "b1");
        assert_eq!(m.scored.source_catalog_name, "A");
        assert_eq!(m.scored.kind, MatchKind::Category);
    }

    #[test]
    fn unrelated_category_left_unmatched() {
        let a = catalog("A", vec![cat("a1", "Garden", "Home/Garden", vec![])]);
        let b = catalog("B", vec![cat("b1", "Laptops", "Computers/Laptops", vec![])]);
        assert!(match_categories(&a, &b, &cfg(0.6)).is_empty());
    }

    #[test]
    fn later_strictly_better_target_wins() {
        let a = catalog("A", vec![cat("a1", "Laptops", "Computers/Laptops", vec![])]);
        let b = catalog(
            "B",
            vec![
                cat("b1", "Laptop", "Computers/Laptop", vec![]),
                cat("b2", "Laptops", "Computers/Laptops", vec![]),
                cat("b3", "Laptops", "Computers/Laptops", vec![]),
            ],
        );
        let matches = match_categories(&a, &b, &cfg(0.6));
        assert_eq!(matches[0].target_category.id, "b2");
        assert_eq!(matches[0].scored.similarity_score, 1.0);
    }

    #[test]
    fn two_sources_may_claim_one_target() {
        let a = catalog(
            "A",
            vec![cat("a1", "Laptops", "Laptops", vec![]), cat("a2", "Laptop", "Laptop", vec![])],
        );
        let b = catalog("B", vec![cat("b1", "Laptops", "Laptops", vec![])]);
        let matches = match_categories(&a, &b, &cfg(0.6));
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.target_category.id == "b1"));
    }

    #[test]
    fn books_attribute_below_threshold() {
        let (a, b) = books_pair();
        let config = cfg(0.5);
        let cats = match_categories(&a, &b, &config);
        assert_eq!(cats.len(), 1);
        // "author" vs "writer" only shares "t" and "r"
        let attrs = match_attributes(&a, &b, &cats, &config);
        assert!(attrs.is_empty());
        assert!(match_list_of_values(&a, &b, &attrs, &config).is_empty());
    }

    #[test]
    fn books_values_with_low_threshold() {
        let (a, b) = books_pair();
        let config = cfg(0.3);
        let cats = match_categories(&a, &b, &config);
        let attrs = match_attributes(&a, &b, &cats, &config);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].source_category_name, "Books");
        assert_eq!(attrs[0].target_category_name, "Book Store");
        assert!(attrs[0].source_attribute.required && attrs[0].target_attribute.required);

        let values = match_list_of_values(&a, &b, &attrs, &config);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].source_value.value, "Fiction");
        assert_eq!(values[0].target_value.value, "Fiction");
        assert_eq!(values[0].scored.similarity_score, 1.0);
        assert_eq!(values[1].source_value.value, "Non-Fiction");
        assert_eq!(values[1].target_value.value, "Non Fiction");
        let s = values[1].scored.similarity_score;
        assert!(s > 0.6 && s < 1.0, "got {s}");
        assert_eq!(values[1].source_attribute_name, "Author");
        assert_eq!(values[1].target_attribute_name, "Writer");
    }

    #[test]
    fn unmatched_category_gates_attributes() {
        let a = catalog(
            "A",
            vec![
                cat("a1", "Shoes", "Fashion/Shoes", vec![attr("a1_c", "Color", &["Red"])]),
                cat("a2", "Garden Tools", "Home/Garden", vec![attr("a2_c", "Color", &["Red"])]),
            ],
        );
        let b = catalog(
            "B",
            vec![cat("b1", "Shoes", "Fashion/Shoes", vec![attr("b1_c", "Colour", &["Red"])])],
        );
        let config = cfg(0.6);
        let cats = match_categories(&a, &b, &config);
        assert_eq!(cats.len(), 1);
        let attrs = match_attributes(&a, &b, &cats, &config);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].source_attribute.id, "a1_c");
        let values = match_list_of_values(&a, &b, &attrs, &config);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].source_category_name, "Shoes");
    }

    #[test]
    fn values_compared_after_normalization() {
        let brand_a = attr("a_b", "Brand", &["Apple Inc.", "Samsung Electronics"]);
        let brand_b = attr("b_b", "Brand", &["Samsung", "Apple"]);
        let a = catalog("A", vec![cat("a1", "Phones", "Phones", vec![brand_a])]);
        let b = catalog("B", vec![cat("b1", "Phones", "Phones", vec![brand_b])]);
        let config = cfg(0.9);
        let cats = match_categories(&a, &b, &config);
        let attrs = match_attributes(&a, &b, &cats, &config);
        let values = match_list_of_values(&a, &b, &attrs, &config);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].target_value.value, "Apple");
        assert_eq!(values[1].target_value.value, "Samsung");
        assert!(values.iter().all(|v| v.scored.similarity_score == 1.0));
    }

    #[test]
    fn stale_category_match_skipped() {
        let (a, b) = books_pair();
        let config = cfg(0.3);
        let mut cats = match_categories(&a, &b, &config);
        cats[0].target_category.id = "gone".into();
        assert!(match_attributes(&a, &b, &cats, &config).is_empty());
    }
}
