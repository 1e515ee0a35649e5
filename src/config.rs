//! Analyzer configuration with sane defaults.

use crate::types::Severity;

/// Tunable cutoffs for aggregation and report rendering.
///
/// The defaults reproduce the reference behavior; callers may tune them,
/// which changes observable output.
#[derive(Debug, Clone)]
pub struct Config {
  /// Max gap in seconds between consecutive problems in one cluster.
  pub cluster_window_secs: i64,
  /// Minimum severity that marks a host as critical.
  pub critical_severity: Severity,
  /// Hosts listed in the "most affected" ranking.
  pub top_hosts: usize,
  /// Patterns listed in the "common patterns" ranking.
  pub top_patterns: usize,
  /// Affected hosts named per pattern before the overflow tail.
  pub pattern_host_samples: usize,
  /// Clusters listed in the report.
  pub top_clusters: usize,
  /// Max cascading-impact hosts (and dependents per host) in predictions.
  pub cascade_limit: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      cluster_window_secs: 300,
      critical_severity: Severity::High,
      top_hosts: 5,
      top_patterns: 3,
      pattern_host_samples: 3,
      top_clusters: 3,
      cascade_limit: 3,
    }
  }
}
