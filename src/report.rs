//! Text report rendering. Pure formatting over an AnalysisResult.
//!
//! The top-N cutoffs and the critical threshold are observable behavior and
//! come from Config; the string template itself carries no logic.

use crate::config::Config;
use crate::types::{AnalysisResult, HostStats, PatternStats};

/// Render the full analysis report, or the "no data" variant for an empty
/// window.
pub fn render(result: &AnalysisResult, config: &Config) -> String {
  if result.total_problems == 0 {
    return "No problems in the analysis window — nothing to analyze.".to_string();
  }

  let hosts = ranked_hosts(result);
  let patterns = ranked_patterns(result);

  let mut out = String::new();
  out.push_str("PROBLEM ANALYSIS REPORT\n\n");

  out.push_str("Overview:\n");
  out.push_str(&format!("- Total problems: {}\n", result.total_problems));
  out.push_str(&format!("- Affected hosts: {}\n", result.host_problems.len()));
  out.push_str(&format!(
    "- Critical hosts (severity >= {}): {}\n\n",
    config.critical_severity.label(),
    result.critical_hosts.len()
  ));

  out.push_str("Severity distribution:\n");
  for (severity, count) in &result.severity_distribution {
    out.push_str(&format!("- {}: {} problems\n", severity.label(), count));
  }
  out.push('\n');

  out.push_str("Most affected hosts:\n");
  for (host, stats) in hosts.iter().take(config.top_hosts) {
    out.push_str(&format!(
      "- {}: {} problems (avg severity: {:.1})\n",
      host,
      stats.count,
      stats.mean_severity()
    ));
  }
  out.push('\n');

  out.push_str("Common patterns:\n");
  for (pattern, stats) in patterns.iter().take(config.top_patterns) {
    let mut host_list = stats
      .hosts
      .iter()
      .take(config.pattern_host_samples)
      .cloned()
      .collect::<Vec<_>>()
      .join(", ");
    if stats.hosts.len() > config.pattern_host_samples {
      host_list.push_str(&format!(
        " and {} other hosts",
        stats.hosts.len() - config.pattern_host_samples
      ));
    }
    out.push_str(&format!(
      "- {}: {} occurrences (hosts: {})\n",
      pattern, stats.count, host_list
    ));
  }
  out.push('\n');

  if !result.critical_hosts.is_empty() {
    out.push_str("Critical hosts:\n");
    for host in &result.critical_hosts {
      out.push_str(&format!("- {}\n", host));
    }
    out.push('\n');
  }

  if !result.host_dependencies.is_empty() {
    out.push_str("Host dependencies:\n");
    for (host, deps) in &result.host_dependencies {
      if !deps.depends_on.is_empty() {
        out.push_str(&format!("- {} depends on: {}\n", host, join(&deps.depends_on)));
      }
      if !deps.depended_by.is_empty() {
        out.push_str(&format!("- {} affects: {}\n", host, join(&deps.depended_by)));
      }
    }
    out.push('\n');
  }

  if !result.problem_clusters.is_empty() {
    out.push_str("Problem clusters (co-occurring):\n");
    for (i, cluster) in result.problem_clusters.iter().take(config.top_clusters).enumerate() {
      let hosts = cluster.distinct_hosts();
      out.push_str(&format!(
        "- Cluster {}: {} problems across {} hosts ({}) starting {}\n",
        i + 1,
        cluster.members.len(),
        hosts.len(),
        hosts.into_iter().collect::<Vec<_>>().join(", "),
        cluster.start_time().format("%Y-%m-%d %H:%M UTC")
      ));
    }
    out.push('\n');
  }

  out.push_str("Predictions:\n");
  if let Some((pattern, _)) = patterns.first() {
    out.push_str(&format!("- Pattern '{}' is likely to recur\n", pattern));
  }
  if let Some((host, _)) = hosts.first() {
    out.push_str(&format!("- Host '{}' is at elevated risk of further problems\n", host));
  }
  let cascades: Vec<_> = result
    .host_dependencies
    .iter()
    .filter(|(host, deps)| result.critical_hosts.contains(*host) && !deps.depended_by.is_empty())
    .take(config.cascade_limit)
    .collect();
  if !cascades.is_empty() {
    out.push_str("- Critical hosts with cascading impact:\n");
    for (host, deps) in cascades {
      let affected = deps
        .depended_by
        .iter()
        .take(config.cascade_limit)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
      out.push_str(&format!("  + {} -> {}\n", host, affected));
    }
  }

  out.push_str("\nRecommendations:\n");
  if !result.critical_hosts.is_empty() {
    out.push_str("- Prioritize checking and fixing the critical hosts\n");
  }
  if !result.problem_clusters.is_empty() {
    out.push_str("- Co-occurring problems may share a common root cause\n");
  }
  if !result.host_dependencies.is_empty() {
    out.push_str("- Review dependency relationships between affected hosts\n");
  }

  out
}

/// Hosts ranked by problem count descending, host name ascending on ties.
fn ranked_hosts(result: &AnalysisResult) -> Vec<(&String, &HostStats)> {
  let mut hosts: Vec<_> = result.host_problems.iter().collect();
  hosts.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
  hosts
}

/// Patterns ranked by occurrence count descending, pattern key ascending on ties.
fn ranked_patterns(result: &AnalysisResult) -> Vec<(&String, &PatternStats)> {
  let mut patterns: Vec<_> = result.problem_patterns.iter().collect();
  patterns.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
  patterns
}

fn join(set: &std::collections::BTreeSet<String>) -> String {
  set.iter().cloned().collect::<Vec<_>>().join(", ")
}
