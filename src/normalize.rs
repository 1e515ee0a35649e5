//! Normalize inbound records into canonical internal models.
//!
//! Severity, clocks, and priorities arrive as loosely-typed scalars from the
//! upstream API. Everything is parsed and validated once here; aggregation
//! never re-parses.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

use crate::error::AnalyzerError;
use crate::types::*;

/// Parse a string-or-int scalar into an i64.
fn parse_i64(raw: &LooseScalar, field: &str) -> Result<i64, AnalyzerError> {
  match raw {
    LooseScalar::Int(v) => Ok(*v),
    LooseScalar::Str(s) => s
      .trim()
      .parse::<i64>()
      .map_err(|_| AnalyzerError::validation(field, &format!("expected integer, got {:?}", s))),
  }
}

fn parse_severity(raw: &LooseScalar, field: &str) -> Result<Severity, AnalyzerError> {
  let v = parse_i64(raw, field)?;
  Severity::from_value(v)
    .ok_or_else(|| AnalyzerError::validation(field, &format!("severity {} out of range 0..=5", v)))
}

/// Loose boolean: 0/1 as int or string, plus "true"/"false". Absent means false.
fn parse_bool_loose(raw: Option<&LooseScalar>, field: &str) -> Result<bool, AnalyzerError> {
  match raw {
    None => Ok(false),
    Some(LooseScalar::Int(v)) => Ok(*v != 0),
    Some(LooseScalar::Str(s)) => match s.trim() {
      "0" | "false" => Ok(false),
      "1" | "true" => Ok(true),
      other => Err(AnalyzerError::validation(
        field,
        &format!("expected 0/1/true/false, got {:?}", other),
      )),
    },
  }
}

fn parse_clock(raw: &LooseScalar, field: &str) -> Result<(i64, DateTime<Utc>), AnalyzerError> {
  let secs = parse_i64(raw, field)?;
  let time = Utc
    .timestamp_opt(secs, 0)
    .single()
    .ok_or_else(|| AnalyzerError::validation(field, &format!("unrepresentable timestamp {}", secs)))?;
  Ok((secs, time))
}

/// Parse and normalize an inbound problem into a canonical Problem.
pub fn problem(raw: &InboundProblem) -> Result<Problem, AnalyzerError> {
  if raw.objectid.is_empty() {
    return Err(AnalyzerError::validation("objectid", "must not be empty"));
  }

  let severity = parse_severity(&raw.severity, "severity")?;
  let (clock, time) = parse_clock(&raw.clock, "clock")?;
  let acknowledged = parse_bool_loose(raw.acknowledged.as_ref(), "acknowledged")?;

  // First associated host wins; hostless problems are attributed to "Unknown".
  let host = raw
    .hosts
    .first()
    .map(|h| h.host.clone())
    .unwrap_or_else(|| "Unknown".to_string());

  Ok(Problem {
    trigger_id: raw.objectid.clone(),
    host,
    name: raw.name.clone(),
    severity,
    clock,
    time,
    acknowledged,
  })
}

/// Parse and normalize an inbound trigger.
pub fn trigger(raw: &InboundTrigger) -> Result<Trigger, AnalyzerError> {
  if raw.triggerid.is_empty() {
    return Err(AnalyzerError::validation("triggerid", "must not be empty"));
  }

  let priority = parse_severity(&raw.priority, "priority")?;

  Ok(Trigger {
    trigger_id: raw.triggerid.clone(),
    description: raw.description.clone(),
    priority,
    dependencies: raw.dependencies.clone(),
  })
}

/// Build the trigger lookup keyed by trigger id. Later duplicates win,
/// matching the upstream map-construction order.
pub fn trigger_map(raws: &[InboundTrigger]) -> Result<HashMap<String, Trigger>, AnalyzerError> {
  let mut map = HashMap::with_capacity(raws.len());
  for raw in raws {
    let t = trigger(raw)?;
    map.insert(t.trigger_id.clone(), t);
  }
  Ok(map)
}
