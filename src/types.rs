//! Core types for the problem analyzer (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// A numeric field that the upstream API may send as a string or an integer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseScalar {
  Int(i64),
  Str(String),
}

/// One inbound problem record. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundProblem {
  pub objectid: String,
  pub name: String,
  #[serde(default)]
  pub hosts: Vec<InboundHostRef>,
  pub severity: LooseScalar,
  pub clock: LooseScalar,
  #[serde(default)]
  pub acknowledged: Option<LooseScalar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundHostRef {
  pub host: String,
}

/// One inbound trigger record, keyed by `triggerid`.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundTrigger {
  pub triggerid: String,
  #[serde(default)]
  pub description: String,
  pub priority: LooseScalar,
  #[serde(default)]
  pub dependencies: Vec<String>,
}

/// One analysis request line on stdin: a window of problems plus the
/// triggers they reference.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
  pub problems: Vec<InboundProblem>,
  #[serde(default)]
  pub triggers: Vec<InboundTrigger>,
}

// ---------------------------------------------------------------------------
// Severity enum (normalized)
// ---------------------------------------------------------------------------

/// Zabbix severity scale. Ordering is significant: higher is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  NotClassified,
  Information,
  Warning,
  Average,
  High,
  Disaster,
}

impl Severity {
  pub fn from_value(v: i64) -> Option<Self> {
    match v {
      0 => Some(Self::NotClassified),
      1 => Some(Self::Information),
      2 => Some(Self::Warning),
      3 => Some(Self::Average),
      4 => Some(Self::High),
      5 => Some(Self::Disaster),
      _ => None,
    }
  }

  pub fn value(self) -> u8 {
    match self {
      Self::NotClassified => 0,
      Self::Information => 1,
      Self::Warning => 2,
      Self::Average => 3,
      Self::High => 4,
      Self::Disaster => 5,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::NotClassified => "Not classified",
      Self::Information => "Information",
      Self::Warning => "Warning",
      Self::Average => "Average",
      Self::High => "High",
      Self::Disaster => "Disaster",
    }
  }
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Canonical internal problem after normalization + validation.
#[derive(Debug, Clone)]
pub struct Problem {
  pub trigger_id: String,
  pub host: String,
  pub name: String,
  pub severity: Severity,
  /// Event time as unix seconds (the upstream `clock` field).
  pub clock: i64,
  pub time: DateTime<Utc>,
  pub acknowledged: bool,
}

/// Canonical internal trigger after normalization + validation.
#[derive(Debug, Clone)]
pub struct Trigger {
  pub trigger_id: String,
  pub description: String,
  pub priority: Severity,
  pub dependencies: Vec<String>,
}

// ---------------------------------------------------------------------------
// Aggregate buckets
// ---------------------------------------------------------------------------

/// Per-host problem statistics.
#[derive(Debug, Clone, Default)]
pub struct HostStats {
  pub count: u64,
  pub severities: Vec<Severity>,
}

impl HostStats {
  /// Mean severity across this host's problems (0.0 when empty).
  pub fn mean_severity(&self) -> f64 {
    if self.severities.is_empty() {
      return 0.0;
    }
    let sum: u64 = self.severities.iter().map(|s| s.value() as u64).sum();
    sum as f64 / self.severities.len() as f64
  }
}

/// Frequency stats for one problem pattern (trigger description).
#[derive(Debug, Clone, Default)]
pub struct PatternStats {
  pub count: u64,
  pub hosts: BTreeSet<String>,
}

/// Direct dependency edges recorded for one host.
#[derive(Debug, Clone, Default)]
pub struct HostDependencies {
  pub depends_on: BTreeSet<String>,
  pub depended_by: BTreeSet<String>,
}

/// A group of >= 2 problems whose consecutive timestamps fall within the
/// clustering window.
#[derive(Debug, Clone)]
pub struct Cluster {
  pub members: Vec<Problem>,
}

impl Cluster {
  /// Timestamp of the earliest member (members are kept time-sorted).
  pub fn start_time(&self) -> DateTime<Utc> {
    self.members[0].time
  }

  pub fn distinct_hosts(&self) -> BTreeSet<&str> {
    self.members.iter().map(|p| p.host.as_str()).collect()
  }
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// Everything derived from one window of problems. Built once per analysis
/// call, immutable afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
  /// Stable id for this input snapshot ("an-" + 16 hex chars).
  pub analysis_id: String,
  pub total_problems: usize,
  pub host_problems: BTreeMap<String, HostStats>,
  pub severity_distribution: BTreeMap<Severity, u64>,
  pub problem_patterns: BTreeMap<String, PatternStats>,
  pub critical_hosts: BTreeSet<String>,
  pub host_dependencies: BTreeMap<String, HostDependencies>,
  pub problem_clusters: Vec<Cluster>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Successful analysis output for one request line.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
  pub analysis_id: String,
  pub total_problems: usize,
  pub affected_hosts: usize,
  pub critical_hosts: usize,
  pub clusters: usize,
  pub report: String,
}

/// Structured error output for invalid input lines.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn severity_round_trips_through_value() {
    for v in 0..=5 {
      let sev = Severity::from_value(v).unwrap();
      assert_eq!(sev.value() as i64, v);
    }
    assert!(Severity::from_value(6).is_none());
    assert!(Severity::from_value(-1).is_none());
  }

  #[test]
  fn severity_ordering_matches_scale() {
    assert!(Severity::Disaster > Severity::High);
    assert!(Severity::High > Severity::Average);
    assert!(Severity::NotClassified < Severity::Information);
  }

  #[test]
  fn mean_severity_one_host() {
    let stats = HostStats {
      count: 2,
      severities: vec![Severity::Disaster, Severity::Warning],
    };
    assert!((stats.mean_severity() - 3.5).abs() < f64::EPSILON);
  }

  #[test]
  fn mean_severity_empty_is_zero() {
    assert_eq!(HostStats::default().mean_severity(), 0.0);
  }

  #[test]
  fn loose_scalar_accepts_both_forms() {
    let from_int: LooseScalar = serde_json::from_str("4").unwrap();
    let from_str: LooseScalar = serde_json::from_str("\"4\"").unwrap();
    assert!(matches!(from_int, LooseScalar::Int(4)));
    assert!(matches!(from_str, LooseScalar::Str(ref s) if s == "4"));
  }
}
