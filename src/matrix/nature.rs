use crate::text::fold;

/// Folded spellings of the membership-dues classification.
const MEMBERSHIP_DUES_KEYS: &[&str] = &["adhesion", "membership", "membership dues"];

/// Whether a donation nature denotes membership dues.
///
/// Comparison ignores case and accents. An absent or blank nature counts as
/// dues, since the donation form defaults to it.
pub fn is_membership_dues(nature: Option<&str>) -> bool {
    let folded = nature.map(fold).unwrap_or_default();
    folded.is_empty() || MEMBERSHIP_DUES_KEYS.contains(&folded.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_spelling() {
        assert!(is_membership_dues(Some("Adhésion")));
        assert!(is_membership_dues(Some("ADHESION")));
        assert!(is_membership_dues(Some(" adhésion ")));
    }

    #[test]
    fn test_english_spelling() {
        assert!(is_membership_dues(Some("Membership")));
        assert!(is_membership_dues(Some("membership dues")));
    }

    #[test]
    fn test_missing_defaults_to_dues() {
        assert!(is_membership_dues(None));
        assert!(is_membership_dues(Some("")));
    }

    #[test]
    fn test_other_natures() {
        assert!(!is_membership_dues(Some("Donation")));
        assert!(!is_membership_dues(Some("Zakat")));
        assert!(!is_membership_dues(Some("adhesion 2024")));
    }
}
