//! Category master list
//!
//! Every product belongs to one of these categories. Input is matched
//! case-insensitively and stored with the canonical spelling.

/// Canonical category names, in display order.
pub const CATEGORIES: [&str; 13] = [
    "Abayas",
    "Dresses",
    "Traditional Wear",
    "Modest Wear",
    "Hijabs & Scarves",
    "Stoles",
    "Accessories",
    "Fashion Bags",
    "Footwear",
    "Jewelry",
    "Beauty & Care",
    "Winter Collection",
    "Gift Items",
];

/// Map user input to its canonical category name.
///
/// Returns `None` when the trimmed input matches no category.
pub fn normalize_category(input: &str) -> Option<&'static str> {
    let needle = input.trim();
    CATEGORIES
        .iter()
        .copied()
        .find(|cat| cat.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_category("abayas"), Some("Abayas"));
        assert_eq!(normalize_category("  HIJABS & SCARVES "), Some("Hijabs & Scarves"));
        assert_eq!(normalize_category("gift items"), Some("Gift Items"));
    }

    #[test]
    fn canonical_input_is_unchanged() {
        for cat in CATEGORIES {
            assert_eq!(normalize_category(cat), Some(cat));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(normalize_category("Electronics"), None);
        assert_eq!(normalize_category(""), None);
        assert_eq!(normalize_category("Abaya"), None);
    }
}
