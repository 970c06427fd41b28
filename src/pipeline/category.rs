use std::collections::HashMap;

/// Normalizes a user-facing category label to its canonical collection key.
///
/// UI labels carry decorative emoji prefixes ("🏠 주거") and synonyms
/// ("핸드폰" for the "통신" collection). Unmapped input passes through
/// unchanged and later fails as `CollectionNotFound` rather than silently
/// matching the wrong collection.
pub fn normalize(label: &str, synonyms: &HashMap<String, String>) -> String {
    let stripped = label
        .trim_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string();

    match synonyms.get(&stripped) {
        Some(canonical) => canonical.clone(),
        None => stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CategorySettings;

    fn synonyms() -> HashMap<String, String> {
        CategorySettings::default().synonyms
    }

    #[test]
    fn strips_decorative_prefix() {
        assert_eq!(normalize("🏠 주거", &synonyms()), "주거");
        assert_eq!(normalize("🛡️ 보험", &synonyms()), "보험");
        assert_eq!(normalize("  금융  ", &synonyms()), "금융");
    }

    #[test]
    fn applies_synonym_table() {
        assert_eq!(normalize("핸드폰", &synonyms()), "통신");
        assert_eq!(normalize("📱 휴대폰", &synonyms()), "통신");
    }

    #[test]
    fn interior_spaces_survive() {
        assert_eq!(normalize("🆘 지원 제도", &synonyms()), "지원 제도");
    }

    #[test]
    fn unmapped_input_passes_through() {
        assert_eq!(normalize("맛집", &synonyms()), "맛집");
        assert_eq!(normalize("general_chat", &synonyms()), "general_chat");
    }
}
