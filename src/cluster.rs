//! Time-window clustering of co-occurring problems.
//!
//! Problems are sorted by clock and walked once: a problem joins the current
//! cluster when its gap to the cluster's last member is <= the window
//! (boundary inclusive, so equal timestamps always co-cluster). Runs with a
//! single member are discarded. The walk partitions the input: no problem
//! lands in two clusters, and clusters come out ordered by their first
//! member's timestamp.

use crate::types::{Cluster, Problem};

pub fn find(problems: &[Problem], window_secs: i64) -> Vec<Cluster> {
  let mut sorted: Vec<Problem> = problems.to_vec();
  sorted.sort_by_key(|p| p.clock);

  let mut clusters = Vec::new();
  let mut current: Vec<Problem> = Vec::new();
  for p in sorted {
    let joins = match current.last() {
      None => true,
      Some(last) => p.clock - last.clock <= window_secs,
    };
    if joins {
      current.push(p);
    } else {
      if current.len() > 1 {
        clusters.push(Cluster {
          members: std::mem::take(&mut current),
        });
      }
      current = vec![p];
    }
  }
  if current.len() > 1 {
    clusters.push(Cluster { members: current });
  }
  clusters
}
