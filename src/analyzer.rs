//! Core analyzer: aggregates a window of problems into an AnalysisResult.

use std::collections::HashMap;

use crate::cluster;
use crate::config::Config;
use crate::dependency;
use crate::error::AnalyzerError;
use crate::normalize;
use crate::types::*;

/// The problem analyzer. Stateless across calls: a pure function from
/// (problems, trigger map) to an AnalysisResult.
pub struct Analyzer {
  config: Config,
}

impl Analyzer {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Normalize inbound records, then aggregate.
  ///
  /// Empty input is not an error: the result carries zeroed aggregates and
  /// renders as the "no data" report variant.
  pub fn analyze(
    &self,
    problems: &[InboundProblem],
    triggers: &[InboundTrigger],
  ) -> Result<AnalysisResult, AnalyzerError> {
    let problems = problems
      .iter()
      .map(normalize::problem)
      .collect::<Result<Vec<_>, _>>()?;
    let trigger_map = normalize::trigger_map(triggers)?;
    Ok(self.aggregate(problems, &trigger_map))
  }

  /// Aggregate canonical problems into an AnalysisResult.
  pub fn aggregate(
    &self,
    problems: Vec<Problem>,
    trigger_map: &HashMap<String, Trigger>,
  ) -> AnalysisResult {
    let mut result = AnalysisResult {
      analysis_id: analysis_id(&problems),
      total_problems: problems.len(),
      host_problems: Default::default(),
      severity_distribution: Default::default(),
      problem_patterns: Default::default(),
      critical_hosts: Default::default(),
      host_dependencies: Default::default(),
      problem_clusters: Vec::new(),
    };

    for p in &problems {
      let host_stats = result.host_problems.entry(p.host.clone()).or_default();
      host_stats.count += 1;
      host_stats.severities.push(p.severity);

      *result.severity_distribution.entry(p.severity).or_insert(0) += 1;

      if p.severity >= self.config.critical_severity {
        result.critical_hosts.insert(p.host.clone());
      }

      let pattern = pattern_key(p, trigger_map);
      let pattern_stats = result.problem_patterns.entry(pattern).or_default();
      pattern_stats.count += 1;
      pattern_stats.hosts.insert(p.host.clone());
    }

    result.host_dependencies = dependency::build(&problems, trigger_map);
    result.problem_clusters = cluster::find(&problems, self.config.cluster_window_secs);

    result
  }
}

/// Pattern key for one problem: the trigger description, falling back to the
/// problem's own name when the trigger id is unknown or the description is
/// empty. Every problem keys exactly one pattern.
fn pattern_key(p: &Problem, trigger_map: &HashMap<String, Trigger>) -> String {
  match trigger_map.get(&p.trigger_id) {
    Some(t) if !t.description.is_empty() => t.description.clone(),
    _ => p.name.clone(),
  }
}

/// Stable id for an input snapshot: hash of each problem's (trigger_id, clock)
/// in input order.
fn analysis_id(problems: &[Problem]) -> String {
  let mut hasher = blake3::Hasher::new();
  for p in problems {
    hasher.update(p.trigger_id.as_bytes());
    hasher.update(b"@");
    hasher.update(p.clock.to_le_bytes().as_slice());
    hasher.update(b"|");
  }
  let hex = hasher.finalize().to_hex();
  format!("an-{}", &hex[..16])
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  fn problem(trigger_id: &str, host: &str, severity: Severity, clock: i64) -> Problem {
    Problem {
      trigger_id: trigger_id.into(),
      host: host.into(),
      name: format!("problem {}", trigger_id),
      severity,
      clock,
      time: Utc.timestamp_opt(clock, 0).unwrap(),
      acknowledged: false,
    }
  }

  fn trigger(id: &str, description: &str, deps: &[&str]) -> Trigger {
    Trigger {
      trigger_id: id.into(),
      description: description.into(),
      priority: Severity::Warning,
      dependencies: deps.iter().map(|d| d.to_string()).collect(),
    }
  }

  fn map_of(triggers: Vec<Trigger>) -> HashMap<String, Trigger> {
    triggers.into_iter().map(|t| (t.trigger_id.clone(), t)).collect()
  }

  #[test]
  fn host_and_severity_counts_partition_the_input() {
    let analyzer = Analyzer::with_defaults();
    let problems = vec![
      problem("t1", "h1", Severity::Disaster, 1000),
      problem("t2", "h1", Severity::Warning, 1100),
      problem("t3", "h2", Severity::Average, 5000),
    ];
    let result = analyzer.aggregate(problems, &HashMap::new());

    assert_eq!(result.total_problems, 3);
    let host_total: u64 = result.host_problems.values().map(|s| s.count).sum();
    assert_eq!(host_total, 3);
    let sev_total: u64 = result.severity_distribution.values().sum();
    assert_eq!(sev_total, 3);
    assert_eq!(result.host_problems["h1"].count, 2);
    assert_eq!(result.host_problems["h2"].count, 1);
  }

  #[test]
  fn critical_set_requires_high_or_worse() {
    let analyzer = Analyzer::with_defaults();
    let problems = vec![
      problem("t1", "h1", Severity::Disaster, 1000),
      problem("t2", "h2", Severity::Average, 1100),
      problem("t3", "h3", Severity::High, 1200),
    ];
    let result = analyzer.aggregate(problems, &HashMap::new());

    assert!(result.critical_hosts.contains("h1"));
    assert!(result.critical_hosts.contains("h3"));
    assert!(!result.critical_hosts.contains("h2"));
  }

  #[test]
  fn pattern_uses_trigger_description_when_known() {
    let analyzer = Analyzer::with_defaults();
    let problems = vec![
      problem("t1", "h1", Severity::Warning, 1000),
      problem("t1", "h2", Severity::Warning, 2000),
    ];
    let triggers = map_of(vec![trigger("t1", "Free disk space < 10%", &[])]);
    let result = analyzer.aggregate(problems, &triggers);

    let stats = &result.problem_patterns["Free disk space < 10%"];
    assert_eq!(stats.count, 2);
    assert_eq!(stats.hosts.len(), 2);
  }

  #[test]
  fn pattern_falls_back_to_problem_name() {
    let analyzer = Analyzer::with_defaults();
    let problems = vec![problem("t9", "h1", Severity::Warning, 1000)];
    let result = analyzer.aggregate(problems, &HashMap::new());

    // Not dropped: keyed by the problem's own name.
    assert_eq!(result.problem_patterns["problem t9"].count, 1);
  }

  #[test]
  fn empty_trigger_description_falls_back_too() {
    let analyzer = Analyzer::with_defaults();
    let problems = vec![problem("t1", "h1", Severity::Warning, 1000)];
    let triggers = map_of(vec![trigger("t1", "", &[])]);
    let result = analyzer.aggregate(problems, &triggers);

    assert!(result.problem_patterns.contains_key("problem t1"));
  }

  #[test]
  fn empty_input_yields_zeroed_result() {
    let analyzer = Analyzer::with_defaults();
    let result = analyzer.aggregate(Vec::new(), &HashMap::new());

    assert_eq!(result.total_problems, 0);
    assert!(result.host_problems.is_empty());
    assert!(result.severity_distribution.is_empty());
    assert!(result.problem_patterns.is_empty());
    assert!(result.critical_hosts.is_empty());
    assert!(result.host_dependencies.is_empty());
    assert!(result.problem_clusters.is_empty());
  }

  #[test]
  fn analysis_id_is_stable_for_identical_input() {
    let analyzer = Analyzer::with_defaults();
    let make = || {
      vec![
        problem("t1", "h1", Severity::Warning, 1000),
        problem("t2", "h2", Severity::High, 1100),
      ]
    };
    let r1 = analyzer.aggregate(make(), &HashMap::new());
    let r2 = analyzer.aggregate(make(), &HashMap::new());
    assert_eq!(r1.analysis_id, r2.analysis_id);
    assert!(r1.analysis_id.starts_with("an-"));
  }

  #[test]
  fn analysis_id_differs_for_different_input() {
    let analyzer = Analyzer::with_defaults();
    let r1 = analyzer.aggregate(vec![problem("t1", "h1", Severity::Warning, 1000)], &HashMap::new());
    let r2 = analyzer.aggregate(vec![problem("t1", "h1", Severity::Warning, 1001)], &HashMap::new());
    assert_ne!(r1.analysis_id, r2.analysis_id);
  }
}
