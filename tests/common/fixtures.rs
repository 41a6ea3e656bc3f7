//! Canned lookup responses used across harnesses.

use typeahead_core::Suggestion;

/// Service response for the query `암`, in service order.
pub fn cancer_suggestions() -> Vec<Suggestion> {
    vec![Suggestion::new("C22", "간암"), Suggestion::new("C44", "피부암")]
}

/// The same response as raw service JSON.
pub const CANCER_JSON: &str = r#"[{"sickCd":"C22","sickNm":"간암"},{"sickCd":"C44","sickNm":"피부암"}]"#;

/// A response longer than the default display cap.
pub fn long_suggestions(query: &str, n: usize) -> Vec<Suggestion> {
    (0..n)
        .map(|i| Suggestion::new(format!("X{i:02}"), format!("{query}{i}")))
        .collect()
}
