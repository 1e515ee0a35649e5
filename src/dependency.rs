//! Host dependency graph construction from trigger dependency edges.
//!
//! A trigger may declare dependencies on other triggers. When both the
//! depending trigger and a dependency target produced a problem in the
//! current window, a host-level edge is recorded: the depending problem's
//! host `depends_on` the target problem's host, mirrored as `depended_by`.
//! Dependencies whose target raised no problem in the window are dropped.

use std::collections::{BTreeMap, HashMap};

use crate::types::{HostDependencies, Problem, Trigger};

/// Build direct (one-level) host dependency edges.
///
/// The trigger-id index makes this O(P·D); when several problems share a
/// trigger id, the first one in input order resolves the edge.
pub fn build(
  problems: &[Problem],
  trigger_map: &HashMap<String, Trigger>,
) -> BTreeMap<String, HostDependencies> {
  let mut host_by_trigger: HashMap<&str, &str> = HashMap::with_capacity(problems.len());
  for p in problems {
    host_by_trigger.entry(p.trigger_id.as_str()).or_insert(p.host.as_str());
  }

  let mut edges: BTreeMap<String, HostDependencies> = BTreeMap::new();
  for p in problems {
    let deps = match trigger_map.get(&p.trigger_id) {
      Some(t) => &t.dependencies,
      None => continue,
    };
    for dep_id in deps {
      if let Some(dep_host) = host_by_trigger.get(dep_id.as_str()) {
        edges
          .entry(p.host.clone())
          .or_default()
          .depends_on
          .insert((*dep_host).to_string());
        edges
          .entry((*dep_host).to_string())
          .or_default()
          .depended_by
          .insert(p.host.clone());
      }
    }
  }
  edges
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Severity;
  use chrono::{TimeZone, Utc};

  fn problem(trigger_id: &str, host: &str) -> Problem {
    Problem {
      trigger_id: trigger_id.into(),
      host: host.into(),
      name: "test".into(),
      severity: Severity::Warning,
      clock: 1000,
      time: Utc.timestamp_opt(1000, 0).unwrap(),
      acknowledged: false,
    }
  }

  fn trigger(id: &str, deps: &[&str]) -> Trigger {
    Trigger {
      trigger_id: id.into(),
      description: format!("trigger {}", id),
      priority: Severity::Warning,
      dependencies: deps.iter().map(|d| d.to_string()).collect(),
    }
  }

  fn map_of(triggers: Vec<Trigger>) -> HashMap<String, Trigger> {
    triggers.into_iter().map(|t| (t.trigger_id.clone(), t)).collect()
  }

  #[test]
  fn records_symmetric_edges() {
    let problems = vec![problem("t1", "app-01"), problem("t2", "db-01")];
    let triggers = map_of(vec![trigger("t1", &["t2"]), trigger("t2", &[])]);

    let edges = build(&problems, &triggers);
    assert!(edges["app-01"].depends_on.contains("db-01"));
    assert!(edges["db-01"].depended_by.contains("app-01"));
    assert!(edges["app-01"].depended_by.is_empty());
    assert!(edges["db-01"].depends_on.is_empty());
  }

  #[test]
  fn dependency_outside_window_is_dropped() {
    // t1 depends on t9, but t9 raised no problem in this window.
    let problems = vec![problem("t1", "app-01")];
    let triggers = map_of(vec![trigger("t1", &["t9"])]);

    let edges = build(&problems, &triggers);
    assert!(edges.is_empty());
  }

  #[test]
  fn unknown_trigger_contributes_no_edges() {
    let problems = vec![problem("t1", "app-01"), problem("t2", "db-01")];
    let triggers = map_of(vec![trigger("t2", &[])]);

    let edges = build(&problems, &triggers);
    assert!(edges.is_empty());
  }

  #[test]
  fn first_problem_resolves_shared_trigger() {
    // Two problems share t2; the edge resolves to the first one's host.
    let problems = vec![
      problem("t1", "app-01"),
      problem("t2", "db-01"),
      problem("t2", "db-02"),
    ];
    let triggers = map_of(vec![trigger("t1", &["t2"]), trigger("t2", &[])]);

    let edges = build(&problems, &triggers);
    assert!(edges["app-01"].depends_on.contains("db-01"));
    assert!(!edges["app-01"].depends_on.contains("db-02"));
  }

  #[test]
  fn multiple_dependencies_fan_out() {
    let problems = vec![
      problem("t1", "app-01"),
      problem("t2", "db-01"),
      problem("t3", "cache-01"),
    ];
    let triggers = map_of(vec![
      trigger("t1", &["t2", "t3"]),
      trigger("t2", &[]),
      trigger("t3", &[]),
    ]);

    let edges = build(&problems, &triggers);
    assert_eq!(edges["app-01"].depends_on.len(), 2);
    assert!(edges["db-01"].depended_by.contains("app-01"));
    assert!(edges["cache-01"].depended_by.contains("app-01"));
  }
}
