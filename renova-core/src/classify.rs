//! Keyword classification of free-text fraction names into waste categories.

use crate::model::WasteCategory;

/// Ordered (keywords, category) rules; the first rule with a matching keyword
/// wins. Order matters because keyword sets can overlap: a name containing
/// both "spesial" and "mat" resolves to [`WasteCategory::Special`].
///
/// Keywords are matched as case-insensitive substrings of the fraction name.
const KEYWORD_RULES: [(&[&str], WasteCategory); 9] = [
    (&["rest"], WasteCategory::General),
    (&["papir", "papp"], WasteCategory::Paper),
    (&["glass"], WasteCategory::Glass),
    (&["plast", "plastic"], WasteCategory::Plastic),
    (&["spesial", "special"], WasteCategory::Special),
    (&["tekstil"], WasteCategory::Clothes),
    (&["hage", "garden"], WasteCategory::Garden),
    (&["hvitevarer", "ee", "farlig"], WasteCategory::Electrical),
    (&["mat", "bio", "organic"], WasteCategory::Bio),
];

/// Classify a fraction name into its canonical waste category.
///
/// Returns `None` when no keyword matches; such fractions are excluded from
/// all category-level output. This is the only failure mode.
#[must_use]
pub fn classify(name: &str) -> Option<WasteCategory> {
    let lowered = name.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|&(_, category)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_norwegian_fraction_names() {
        assert_eq!(classify("Restavfall"), Some(WasteCategory::General));
        assert_eq!(classify("Papiravfall"), Some(WasteCategory::Paper));
        assert_eq!(classify("Matavfall"), Some(WasteCategory::Bio));
        assert_eq!(classify("Glass- og metallemballasje"), Some(WasteCategory::Glass));
        assert_eq!(classify("Plastemballasje"), Some(WasteCategory::Plastic));
        assert_eq!(classify("Spesialavfall"), Some(WasteCategory::Special));
        assert_eq!(classify("Hageavfall"), Some(WasteCategory::Garden));
        assert_eq!(classify("Tekstil"), Some(WasteCategory::Clothes));
        assert_eq!(classify("Farlig avfall"), Some(WasteCategory::Electrical));
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("RESTAVFALL"), Some(WasteCategory::General));
        assert_eq!(classify("organic household"), Some(WasteCategory::Bio));
    }

    #[test]
    fn unknown_names_yield_none() {
        assert_eq!(classify("unrecognizable xyz"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn first_matching_rule_wins_on_overlap() {
        // "spesial" (rule 5) outranks "mat" (rule 9) regardless of position
        // in the name itself.
        assert_eq!(classify("Matavfall og spesialavfall"), Some(WasteCategory::Special));
        // "rest" is the very first rule, so it shadows everything after it.
        assert_eq!(classify("Restavfall med plast"), Some(WasteCategory::General));
    }
}
