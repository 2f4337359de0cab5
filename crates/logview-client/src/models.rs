//! Transport records for the logsys API.
//!
//! These are wire types, not owned domain objects: validation and
//! persistence lifecycle belong to the server. Unknown fields are
//! tolerated everywhere, and [`LogEntry`] preserves them so the detail
//! viewer can display fields this client does not know about.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The authenticated user, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name of the user.
    pub username: String,
}

/// A project registered with the log service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned project identifier.
    pub id: String,
    /// Human-readable project name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// How long ingested logs are retained, in seconds.
    #[serde(default)]
    pub log_ttl_seconds: u64,
    /// Payload fields indexed for filtering.
    #[serde(default)]
    pub searchable_keys: Vec<String>,
}

/// The ingestion key for a project, revealed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// The key value.
    pub api_key: String,
}

/// One row of the aggregated log view: raw events grouped by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedLogEntry {
    /// The event name this row groups.
    pub event_name: String,
    /// Number of events with this name in the queried range.
    pub total_count: u64,
    /// Timestamp of the most recent matching event.
    pub last_seen: DateTime<Utc>,
}

/// A single ingested log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Server-assigned log identifier.
    pub id: String,
    /// The project this event belongs to.
    pub project_id: String,
    /// Name of the event.
    pub event_name: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Indexed key/value pairs extracted from the payload.
    #[serde(default)]
    pub searchable_keys: BTreeMap<String, String>,
    /// The raw event payload.
    #[serde(default)]
    pub payload: Value,
    /// Any additional top-level fields the server included.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Request body for `POST /projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    /// Project name (required by the server).
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Payload fields to index for filtering.
    pub searchable_keys: Vec<String>,
    /// Retention period for ingested logs, in seconds.
    pub log_ttl_seconds: u64,
}

impl NewProject {
    /// Build a creation request from raw form-style inputs.
    ///
    /// `searchable_keys` is a comma-separated list; entries are trimmed
    /// and empty entries dropped, so `"a, b ,c"` becomes `["a","b","c"]`.
    #[must_use]
    pub fn from_form(
        name: impl Into<String>,
        description: Option<String>,
        searchable_keys: &str,
        log_ttl_seconds: u64,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            searchable_keys: parse_key_list(searchable_keys),
            log_ttl_seconds,
        }
    }
}

/// Split a comma-separated key list, trimming entries and dropping empties.
#[must_use]
pub fn parse_key_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Filter parameters for the log endpoints.
///
/// All fields are optional; unset or empty fields are omitted from the
/// query string. `search_keys` is passed through verbatim; its match
/// semantics are server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Restrict to events with this exact name.
    pub event_name: Option<String>,
    /// Lower bound on the event timestamp.
    pub start_time: Option<String>,
    /// Upper bound on the event timestamp.
    pub end_time: Option<String>,
    /// Opaque search-key filter expression.
    pub search_keys: Option<String>,
}

impl LogQuery {
    /// An empty filter (no constraints).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// This filter narrowed to a single event name.
    ///
    /// Used by the drilldown: the active search filter is kept and the
    /// selected event name overlaid.
    #[must_use]
    pub fn for_event(&self, event_name: impl Into<String>) -> Self {
        Self {
            event_name: Some(event_name.into()),
            ..self.clone()
        }
    }

    /// Build query pairs, omitting unset and empty values.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, &str)> {
        let fields = [
            ("event_name", &self.event_name),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("search_keys", &self.search_keys),
        ];
        fields
            .into_iter()
            .filter_map(|(name, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((name, v)),
                _ => None,
            })
            .collect()
    }

    /// Check whether the filter has no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    /// Set a filter field by its wire name, dropping the field when the
    /// value is empty. Returns `false` for an unknown field name.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "event_name" => &mut self.event_name,
            "start_time" => &mut self.start_time,
            "end_time" => &mut self.end_time,
            "search_keys" => &mut self.search_keys,
            _ => return false,
        };
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        true
    }
}
