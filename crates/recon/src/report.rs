use std::collections::HashMap;

use crate::model::{round_score, ReconResult, ValueMatch};

const RULE_WIDTH: usize = 80;

/// Human-readable rendering of a match result.
///
/// Records appear in the order they were produced. Value matches are grouped
/// under their (source attribute, target attribute) name pair, groups in
/// first-seen order.
pub fn generate_report(result: &ReconResult) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::new();

    lines.push(heavy.clone());
    lines.push("CATALOG MATCHING REPORT".to_string());
    lines.push(heavy.clone());
    lines.push(String::new());

    let s = &result.summary;
    lines.push("SUMMARY:".to_string());
    lines.push(format!("  Total Category Matches: {}", s.total_category_matches));
    lines.push(format!("  Total Attribute Matches: {}", s.total_attribute_matches));
    lines.push(format!("  Total LOV Matches: {}", s.total_lov_matches));
    lines.push(String::new());

    section(&mut lines, &light, "CATEGORY MATCHES:");
    for m in &result.category_matches {
        lines.push(String::new());
        lines.push(format!("Match Score: {}", display_score(m.scored.similarity_score)));
        lines.push(format!("  {}: {}", m.scored.source_catalog_name, m.source_category.name));
        lines.push(format!("  {}: {}", m.scored.target_catalog_name, m.target_category.name));
    }
    lines.push(String::new());

    section(&mut lines, &light, "ATTRIBUTE MATCHES:");
    for m in &result.attribute_matches {
        lines.push(String::new());
        lines.push(format!("Match Score: {}", display_score(m.scored.similarity_score)));
        lines.push(format!(
            "  Category: {} <-> {}",
            m.source_category_name, m.target_category_name
        ));
        lines.push(format!(
            "  {}: {} (Required: {})",
            m.scored.source_catalog_name, m.source_attribute.name, m.source_attribute.required
        ));
        lines.push(format!(
            "  {}: {} (Required: {})",
            m.scored.target_catalog_name, m.target_attribute.name, m.target_attribute.required
        ));
    }
    lines.push(String::new());

    section(&mut lines, &light, "LIST OF VALUES MATCHES:");
    for ((source_attr, target_attr), group) in group_by_attribute(&result.lov_matches) {
        lines.push(String::new());
        lines.push(format!("Attribute: {source_attr} <-> {target_attr}"));
        for m in group {
            lines.push(format!(
                "  Score {}: {} <-> {}",
                display_score(m.scored.similarity_score),
                m.source_value.value,
                m.target_value.value
            ));
        }
    }
    lines.push(String::new());
    lines.push(heavy);

    lines.join("\n")
}

/// Score rounded to 3 decimals in its shortest form (`0.931`, `0.7`, `1.0`).
fn display_score(score: f64) -> String {
    let rounded = round_score(score);
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        rounded.to_string()
    }
}

fn section(lines: &mut Vec<String>, rule: &str, title: &str) {
    lines.push(rule.to_string());
    lines.push(title.to_string());
    lines.push(rule.to_string());
}

type AttributePair<'a> = (&'a str, &'a str);

fn group_by_attribute(matches: &[ValueMatch]) -> Vec<(AttributePair<'_>, Vec<&ValueMatch>)> {
    let mut groups: Vec<(AttributePair<'_>, Vec<&ValueMatch>)> = Vec::new();
    let mut index: HashMap<AttributePair<'_>, usize> = HashMap::new();
    for m in matches {
        let key = (m.source_attribute_name.as_str(), m.target_attribute_name.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(m);
    }
    groups
}
