//! Reading run events from disk and picking the ones worth graphing.
//!
//! Three document shapes are accepted:
//!
//! - an envelope object `{"events": [...]}`
//! - a bare JSON array of events
//! - JSON Lines, one event per line (the OpenLineage file transport)
//!
//! A single event object on its own is treated as a one-event list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{LineageError, Result};
use crate::types::Event;

/// Read and parse an event file.
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LineageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let events = parse_events(&text)?;
    tracing::debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Parse events from a JSON document or JSON Lines text.
pub fn parse_events(text: &str) -> Result<Vec<Event>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let entries = match serde_json::from_str::<Value>(text) {
        Ok(document) => document_entries(document)?,
        Err(err) if text.lines().filter(|l| !l.trim().is_empty()).count() > 1 => {
            tracing::debug!("Not a single JSON document ({}), trying JSON Lines", err);
            json_lines_entries(text)?
        }
        Err(err) => return Err(err.into()),
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| to_event(i, entry))
        .collect())
}

fn document_entries(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => match map.remove("events") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(LineageError::UnrecognisedDocument {
                message: format!("\"events\" is {}, expected an array", json_kind(&other)),
            }),
            None => Ok(vec![Value::Object(map)]),
        },
        other => Err(LineageError::UnrecognisedDocument {
            message: format!("top-level {}, expected an object or array", json_kind(&other)),
        }),
    }
}

fn json_lines_entries(text: &str) -> Result<Vec<Value>> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = serde_json::from_str(line).map_err(|source| LineageError::JsonLine {
            line: i + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn to_event(position: usize, entry: Value) -> Option<Event> {
    if !entry.is_object() {
        tracing::warn!(
            "Skipping event #{}: expected an object, found {}",
            position + 1,
            json_kind(&entry)
        );
        return None;
    }
    match serde_json::from_value(entry) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!("Skipping event #{}: {}", position + 1, err);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Keep the most recent `COMPLETE` event of each job, newest first.
///
/// Jobs are keyed by `job.name`. Event times are compared as instants when
/// they parse (RFC 3339, or ISO 8601 without offset read as UTC) and as plain
/// strings otherwise; unparsable times sort before parsable ones. On equal
/// times the earlier event in the input wins.
pub fn latest_complete_per_job(events: Vec<Event>) -> Vec<Event> {
    let total = events.len();
    let mut latest: Vec<Event> = Vec::new();
    let mut by_job: HashMap<String, usize> = HashMap::new();

    for event in events.into_iter().filter(Event::is_complete) {
        match by_job.get(event.job_name()) {
            Some(&slot) => {
                if compare_event_time(&event, &latest[slot]) == Ordering::Greater {
                    latest[slot] = event;
                }
            }
            None => {
                by_job.insert(event.job_name().to_string(), latest.len());
                latest.push(event);
            }
        }
    }

    latest.sort_by(|a, b| compare_event_time(b, a));
    tracing::debug!(
        "Selected {} latest COMPLETE events out of {}",
        latest.len(),
        total
    );
    latest
}

fn compare_event_time(a: &Event, b: &Event) -> Ordering {
    let a_time = a.event_time.as_deref().unwrap_or_default();
    let b_time = b.event_time.as_deref().unwrap_or_default();
    (parse_event_time(a_time), a_time).cmp(&(parse_event_time(b_time), b_time))
}

/// Parse an OpenLineage `eventTime`.
pub fn parse_event_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        })
}
