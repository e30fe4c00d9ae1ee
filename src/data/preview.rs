//! Shaping of the executive data-preview tables. Pure functions shared by
//! the TUI screen and the `preview` subcommand.

use serde_json::Value;

/// How many characters of a string cell survive before truncation.
pub const CELL_LIMIT: usize = 50;

/// One fetch of a collection. No caching and no pagination: a panel is
/// either in flight, failed, empty, or showing rows.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    Loading,
    Failed(String),
    Empty,
    Loaded(Vec<Value>),
}

impl PreviewState {
    pub fn from_rows(rows: Vec<Value>) -> Self {
        if rows.is_empty() {
            PreviewState::Empty
        } else {
            PreviewState::Loaded(rows)
        }
    }
}

/// Columns are the keys of the first row in the order the server sent them
/// (`preserve_order`); later rows may carry more keys but those are not
/// displayed.
pub fn columns_of(rows: &[Value]) -> Vec<String> {
    rows.first()
        .and_then(|row| row.as_object())
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

/// Render one cell: strings longer than [`CELL_LIMIT`] characters are cut
/// to the first 50 followed by `...`; nulls and missing keys become `N/A`;
/// everything else prints its JSON form without quotes.
pub fn render_cell(row: &Value, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => {
            if s.chars().count() > CELL_LIMIT {
                let head: String = s.chars().take(CELL_LIMIT).collect();
                format!("{}...", head)
            } else {
                s.clone()
            }
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn columns_come_from_the_first_row_only() {
        let rows = vec![
            json!({"ts": "2025-08-01", "value": 3.2}),
            json!({"ts": "2025-08-02", "value": 1.8, "extra": true}),
        ];
        let cols = columns_of(&rows);
        assert_eq!(cols.len(), 2);
        assert!(cols.contains(&"ts".to_string()));
        assert!(cols.contains(&"value".to_string()));
        assert!(columns_of(&[]).is_empty());
    }

    #[test]
    fn column_order_follows_the_first_row() {
        let rows = vec![json!({ "zeta": 1, "alpha": 2, "media": 3 })];
        assert_eq!(columns_of(&rows), vec!["zeta", "alpha", "media"]);
    }

    #[test]
    fn long_strings_are_cut_at_fifty_chars_plus_ellipsis() {
        let long = "x".repeat(80);
        let row = json!({ "payload": long });
        let cell = render_cell(&row, "payload");
        assert_eq!(cell, format!("{}...", "x".repeat(50)));
        assert_eq!(cell.len(), 53);
    }

    #[test]
    fn short_strings_pass_through_untouched() {
        let row = json!({ "ciudad": "Cochabamba" });
        assert_eq!(render_cell(&row, "ciudad"), "Cochabamba");
        let exactly_fifty = "y".repeat(50);
        let row = json!({ "p": exactly_fifty });
        assert_eq!(render_cell(&row, "p"), "y".repeat(50));
    }

    #[test]
    fn nulls_and_missing_keys_render_na() {
        let row = json!({ "a": null });
        assert_eq!(render_cell(&row, "a"), "N/A");
        assert_eq!(render_cell(&row, "missing"), "N/A");
    }

    #[test]
    fn numbers_and_bools_render_bare() {
        let row = json!({ "n": 42.5, "b": false });
        assert_eq!(render_cell(&row, "n"), "42.5");
        assert_eq!(render_cell(&row, "b"), "false");
    }

    #[test]
    fn empty_result_set_maps_to_the_empty_state() {
        assert_eq!(PreviewState::from_rows(vec![]), PreviewState::Empty);
        let loaded = PreviewState::from_rows(vec![json!({"a": 1})]);
        assert!(matches!(loaded, PreviewState::Loaded(rows) if rows.len() == 1));
    }
}
