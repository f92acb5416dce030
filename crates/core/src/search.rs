//! Text matching for list filters and searchable dropdowns.

use serde::Serialize;

/// Default number of options a searchable dropdown shows.
pub const DEFAULT_OPTION_LIMIT: usize = 20;

/// Case-insensitive match of every whitespace-separated term against at
/// least one of `fields`. An empty or blank query matches everything.
pub fn matches_query(query: &str, fields: &[&str]) -> bool {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return true;
    }
    let haystacks: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
    terms
        .iter()
        .all(|term| haystacks.iter().any(|h| h.contains(term.as_str())))
}

/// A selectable option in a searchable dropdown (users, departments, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Filter dropdown options by query, ranking label prefix matches first and
/// keeping the original order otherwise.
pub fn filter_options(options: &[SelectOption], query: &str, limit: usize) -> Vec<SelectOption> {
    let needle = query.trim().to_lowercase();
    let mut prefix = Vec::new();
    let mut rest = Vec::new();

    for option in options {
        let hint = option.hint.as_deref().unwrap_or("");
        if !matches_query(&needle, &[&option.label, hint]) {
            continue;
        }
        if !needle.is_empty() && option.label.to_lowercase().starts_with(&needle) {
            prefix.push(option.clone());
        } else {
            rest.push(option.clone());
        }
    }

    prefix.into_iter().chain(rest).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_matches_everything() {
        assert!(matches_query("", &["anything"]));
        assert!(matches_query("   ", &[]));
    }

    #[test]
    fn all_terms_must_match_some_field() {
        let fields = ["Forklift collision", "INC-2026-0042", "Warehouse B"];
        assert!(matches_query("forklift warehouse", &fields));
        assert!(matches_query("inc-2026", &fields));
        assert!(!matches_query("forklift office", &fields));
    }

    #[test]
    fn prefix_matches_rank_first() {
        let options = vec![
            SelectOption::new("1", "Maintenance"),
            SelectOption::new("2", "Operations Team A"),
            SelectOption::new("3", "Team Leads"),
        ];
        let found = filter_options(&options, "team", 10);
        let labels: Vec<_> = found.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Team Leads", "Operations Team A"]);
    }

    #[test]
    fn hints_are_searched_and_limit_applies() {
        let options = vec![
            SelectOption::new("u1", "Ada Lovelace").with_hint("ada@example.com"),
            SelectOption::new("u2", "Grace Hopper").with_hint("grace@example.com"),
        ];
        assert_eq!(filter_options(&options, "example.com", 1).len(), 1);
        assert_eq!(filter_options(&options, "grace@", 10)[0].value, "u2");
    }
}
