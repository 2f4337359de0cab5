//! Terminal rendering for tables and the log detail view.
//!
//! Every server-supplied string is passed through [`sanitize`] before it
//! reaches the terminal, so log payloads cannot inject control sequences.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use logview_client::{AggregatedLogEntry, LogEntry, Project};
use serde_json::Value;

/// Replace control characters with caret notation.
///
/// `ESC` becomes `^[`, `DEL` becomes `^?`, and other C0 controls map to
/// `^@`..`^_`; remaining control characters become U+FFFD. Printable
/// text, including markup like `<img src=x>`, passes through unchanged.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\u{00}'..='\u{1f}' => {
                out.push('^');
                out.push(char::from(b'@' + c as u8));
            }
            '\u{7f}' => out.push_str("^?"),
            c if c.is_control() => out.push('\u{fffd}'),
            c => out.push(c),
        }
    }
    out
}

/// Format a timestamp in the reader's local timezone.
#[must_use]
pub fn format_local(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Render a padded text table with a header row.
///
/// All cells are sanitized. Column widths are computed from the content.
#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| sanitize(cell)).collect())
        .collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", header_line.join("  ").trim_end());
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", separator.join("  "));
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Render the project list.
#[must_use]
pub fn projects_table(projects: &[Project]) -> String {
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|project| {
            vec![
                project.name.clone(),
                project.id.clone(),
                project.description.clone().unwrap_or_default(),
                project.log_ttl_seconds.to_string(),
                project.searchable_keys.join(", "),
            ]
        })
        .collect();
    table(
        &["NAME", "ID", "DESCRIPTION", "TTL (S)", "SEARCHABLE KEYS"],
        &rows,
    )
}

/// Render the aggregated log table: one row per distinct event name.
#[must_use]
pub fn aggregated_table(entries: &[AggregatedLogEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.event_name.clone(),
                entry.total_count.to_string(),
                format_local(&entry.last_seen),
            ]
        })
        .collect();
    table(&["EVENT", "COUNT", "LAST SEEN"], &rows)
}

/// Render an aligned key/value grid, or a `(none)` placeholder.
///
/// Keys and values are sanitized.
#[must_use]
pub fn grid(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return "  (none)\n".to_string();
    }
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (sanitize(k), sanitize(v)))
        .collect();
    let width = pairs
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        + 1;
    let mut out = String::new();
    for (key, value) in &pairs {
        let label = format!("{key}:");
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }
    out
}

/// Render a JSON value for display: strings bare, everything else as
/// compact JSON.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Key/value pairs for a payload value.
///
/// Objects become their entries; `null` has no pairs; any other shape is
/// shown as a single `value` row.
#[must_use]
pub fn payload_pairs(payload: &Value) -> Vec<(String, String)> {
    match payload {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), value_to_string(v)))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![("value".to_string(), value_to_string(other))],
    }
}

/// Render the full detail view for one log entry.
#[must_use]
pub fn log_detail(log: &LogEntry) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(64));
    let event_name = if log.event_name.is_empty() {
        "(no event name)".to_string()
    } else {
        sanitize(&log.event_name)
    };
    let _ = writeln!(out, " {event_name}");
    let _ = writeln!(out, " {}", format_local(&log.timestamp));
    let _ = writeln!(out, "{}", "-".repeat(64));
    let _ = write!(
        out,
        "{}",
        grid(&[
            ("Log ID".to_string(), log.id.clone()),
            ("Project ID".to_string(), log.project_id.clone()),
        ])
    );

    let _ = writeln!(out, "\n Searchable Keys");
    let key_pairs: Vec<(String, String)> = log
        .searchable_keys
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let _ = write!(out, "{}", grid(&key_pairs));

    let _ = writeln!(out, "\n Payload");
    let _ = write!(out, "{}", grid(&payload_pairs(&log.payload)));

    if !log.extra.is_empty() {
        let _ = writeln!(out, "\n Other Fields");
        let extra_pairs: Vec<(String, String)> = log
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), value_to_string(v)))
            .collect();
        let _ = write!(out, "{}", grid(&extra_pairs));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use serde_json::json;

    fn log_entry() -> LogEntry {
        serde_json::from_value(json!({
            "id": "l1",
            "project_id": "p1",
            "event_name": "login_failed",
            "timestamp": "2026-08-01T12:00:00Z",
            "searchable_keys": {"user_id": "42"},
            "payload": {"reason": "bad password"},
            "region": "eu-west-1"
        }))
        .unwrap()
    }

    #[test]
    fn test_sanitize_passes_markup_through_literally() {
        assert_eq!(sanitize("<img src=x>"), "<img src=x>");
        assert_eq!(sanitize("plain text"), "plain text");
    }

    #[test]
    fn test_sanitize_escapes_control_characters() {
        assert_eq!(sanitize("\u{1b}[31mred"), "^[[31mred");
        assert_eq!(sanitize("a\nb"), "a^Jb");
        assert_eq!(sanitize("tab\there"), "tab^Ihere");
        assert_eq!(sanitize("\u{7f}"), "^?");
    }

    #[test]
    fn test_sanitize_replaces_other_controls() {
        // U+0085 NEL is a non-C0 control
        assert_eq!(sanitize("\u{85}"), "\u{fffd}");
    }

    #[test]
    fn test_grid_empty_is_none_placeholder() {
        assert_eq!(grid(&[]), "  (none)\n");
    }

    #[test]
    fn test_grid_aligns_keys() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("longer".to_string(), "2".to_string()),
        ];
        let out = grid(&pairs);
        assert_eq!(out, "  a:       1\n  longer:  2\n");
    }

    #[test]
    fn test_grid_sanitizes_keys_and_values() {
        let pairs = vec![("k\u{1b}".to_string(), "v\u{1b}".to_string())];
        let out = grid(&pairs);
        assert!(out.contains("k^["));
        assert!(out.contains("v^["));
    }

    #[test]
    fn test_table_pads_columns() {
        let rows = vec![
            vec!["a".to_string(), "bb".to_string()],
            vec!["ccc".to_string(), "d".to_string()],
        ];
        let out = table(&["X", "YY"], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "X    YY");
        assert_eq!(lines[1], "---  --");
        assert_eq!(lines[2], "a    bb");
        assert_eq!(lines[3], "ccc  d");
    }

    #[test]
    fn test_projects_table_includes_fields() {
        let projects: Vec<Project> = serde_json::from_value(json!([
            {
                "id": "p1",
                "name": "checkout",
                "description": "payments",
                "log_ttl_seconds": 3600,
                "searchable_keys": ["user_id", "region"]
            }
        ]))
        .unwrap();
        let out = projects_table(&projects);
        assert!(out.contains("checkout"));
        assert!(out.contains("p1"));
        assert!(out.contains("user_id, region"));
        assert!(out.contains("3600"));
    }

    #[test]
    fn test_aggregated_table_one_row_per_event() {
        let entries: Vec<AggregatedLogEntry> = serde_json::from_value(json!([
            {"event_name": "login_failed", "total_count": 17, "last_seen": "2026-08-01T12:00:00Z"},
            {"event_name": "signup", "total_count": 4, "last_seen": "2026-08-02T09:30:00Z"}
        ]))
        .unwrap();
        let out = aggregated_table(&entries);
        assert!(out.contains("login_failed"));
        assert!(out.contains("17"));
        assert!(out.contains("signup"));
        // header + separator + 2 rows
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_value_to_string_shapes() {
        assert_eq!(value_to_string(&json!("plain")), "plain");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_payload_pairs_object() {
        let pairs = payload_pairs(&json!({"reason": "bad password", "attempts": 3}));
        assert!(pairs.contains(&("reason".to_string(), "bad password".to_string())));
        assert!(pairs.contains(&("attempts".to_string(), "3".to_string())));
    }

    #[test]
    fn test_payload_pairs_null_and_scalar() {
        assert!(payload_pairs(&Value::Null).is_empty());
        assert_eq!(
            payload_pairs(&json!("raw")),
            vec![("value".to_string(), "raw".to_string())]
        );
    }

    #[test]
    fn test_log_detail_contains_all_sections() {
        let out = log_detail(&log_entry());
        assert!(out.contains("login_failed"));
        assert!(out.contains("Log ID"));
        assert!(out.contains("l1"));
        assert!(out.contains("Searchable Keys"));
        assert!(out.contains("user_id"));
        assert!(out.contains("Payload"));
        assert!(out.contains("bad password"));
        assert!(out.contains("Other Fields"));
        assert!(out.contains("eu-west-1"));
    }

    #[test]
    fn test_log_detail_omits_other_fields_when_empty() {
        let mut log = log_entry();
        log.extra = BTreeMap::new();
        let out = log_detail(&log);
        assert!(!out.contains("Other Fields"));
    }

    #[test]
    fn test_log_detail_escapes_payload_values() {
        let mut log = log_entry();
        log.payload = json!({"note": "<img src=x>\u{1b}[2J"});
        let out = log_detail(&log);
        assert!(out.contains("<img src=x>^[[2J"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_log_detail_empty_event_name_placeholder() {
        let mut log = log_entry();
        log.event_name = String::new();
        let out = log_detail(&log);
        assert!(out.contains("(no event name)"));
    }

    #[test]
    fn test_format_local_shape() {
        let timestamp: DateTime<Utc> = "2026-08-01T12:00:00Z".parse().unwrap();
        let out = format_local(&timestamp);
        // Exact value depends on the local zone; the shape does not.
        assert!(chrono::NaiveDateTime::parse_from_str(&out, "%Y-%m-%d %H:%M:%S").is_ok());
    }
}
