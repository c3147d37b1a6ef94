/// Boilerplate removed from LOV literals before comparison, applied in order.
///
/// Plain substring replacement: "purely" loses its "pure" too.
pub const BOILERPLATE: &[&str] = &[
    "inc.",
    "corporation",
    "technologies",
    "electronics",
    "100%",
    "pure",
    "brand",
];

/// Canonical form of a value literal: lowercase, trimmed, boilerplate
/// removed, whitespace runs collapsed to single spaces.
pub fn normalize_value(value: &str) -> String {
    let mut normalized = value.trim().to_lowercase();
    for token in BOILERPLATE {
        if normalized.contains(token) {
            normalized = normalized.replace(token, "");
        }
    }
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_value("  Navy Blue "), "navy blue");
    }

    #[test]
    fn strips_company_suffixes() {
        assert_eq!(normalize_value("Apple Inc."), "apple");
        assert_eq!(normalize_value("Samsung Electronics"), "samsung");
        assert_eq!(normalize_value("Sony Corporation"), "sony");
        assert_eq!(normalize_value("100% Pure Cotton"), "cotton");
    }

    #[test]
    fn collapses_inner_whitespace_left_by_removal() {
        assert_eq!(normalize_value("Acme  Brand   Shoes"), "acme shoes");
    }

    #[test]
    fn replacement_is_not_word_aware() {
        assert_eq!(normalize_value("Purely Organic"), "ly organic");
        assert_eq!(normalize_value("Rebranded"), "reed");
    }

    #[test]
    fn hyphen_is_kept() {
        assert_eq!(normalize_value("Non-Fiction"), "non-fiction");
    }

    #[test]
    fn value_made_of_boilerplate_becomes_empty() {
        assert_eq!(normalize_value("Brand"), "");
    }
}
