/// The categories an expense can be logged under, in display order.
pub const CATEGORIES: [&str; 9] = [
    "Cooking/Groceries",
    EATING_OUT,
    "Transportation",
    "Projects",
    "Utilities",
    BEAUTY_GROOMING,
    "Clothing",
    TRAVEL_ADVENTURE,
    OTHER,
];

/// The catch-all category, also used when a subscription has no category.
pub const OTHER: &str = "Other";

const EATING_OUT: &str = "Eating Out";
const BEAUTY_GROOMING: &str = "Beauty/Grooming";
const TRAVEL_ADVENTURE: &str = "Travel/Adventure";

// Labels used by the first year of data before the category list settled.
const LEGACY_HIGH_FALLS: &str = "Personal-High Falls Gorge";
const LEGACY_PERSONAL: &str = "Personal";

/// Cleans up a category name read from a data source.
///
/// Any casing of "eating out" becomes `Eating Out`, and the two legacy labels are mapped onto
/// their replacements. Everything else is returned trimmed but otherwise untouched, so applying
/// this twice gives the same result as applying it once.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(EATING_OUT) {
        EATING_OUT.to_string()
    } else if trimmed == LEGACY_HIGH_FALLS {
        TRAVEL_ADVENTURE.to_string()
    } else if trimmed == LEGACY_PERSONAL {
        BEAUTY_GROOMING.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolves `raw` to one of the `CATEGORIES`, ignoring case. Returns `None` when the name is not
/// a known category even after normalization.
pub fn canonical_category(raw: &str) -> Option<&'static str> {
    let normalized = normalize_category(raw);
    CATEGORIES
        .into_iter()
        .find(|c| c.eq_ignore_ascii_case(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eating_out_variants() {
        for raw in ["EAting Out", "eating out", "Eating Out", "  EATING OUT  "] {
            assert_eq!(normalize_category(raw), "Eating Out", "{raw}");
        }
    }

    #[test]
    fn test_legacy_labels() {
        assert_eq!(
            normalize_category("Personal-High Falls Gorge"),
            "Travel/Adventure"
        );
        assert_eq!(normalize_category(" Personal "), "Beauty/Grooming");
    }

    #[test]
    fn test_passthrough_is_trimmed() {
        assert_eq!(normalize_category("  Food "), "Food");
        assert_eq!(normalize_category(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "EAting Out",
            "Personal",
            "Personal-High Falls Gorge",
            " Utilities ",
            "Something Else",
            "personal",
        ];
        for raw in inputs {
            let once = normalize_category(raw);
            assert_eq!(normalize_category(&once), once, "{raw}");
        }
    }

    #[test]
    fn test_canonical_category() {
        assert_eq!(canonical_category("cooking/groceries"), Some("Cooking/Groceries"));
        assert_eq!(canonical_category("EAting Out"), Some("Eating Out"));
        assert_eq!(canonical_category("Personal"), Some("Beauty/Grooming"));
        assert_eq!(canonical_category("OTHER"), Some("Other"));
        assert_eq!(canonical_category("Food"), None);
        assert_eq!(canonical_category(""), None);
    }
}
