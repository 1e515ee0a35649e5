//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an AnalysisRequest (problems + triggers for one
//! window). Output lines are either:
//! - An AnalysisOutput with the rendered report
//! - An ErrorOutput (when parsing or validation fails)
//!
//! An empty problem list is valid and yields the "no data" report variant.

use problem_analyzer::types::{AnalysisOutput, ErrorOutput};
use problem_analyzer::{AnalysisRequest, Analyzer, AnalyzerError};
use problem_analyzer::report;
use std::io::{self, BufRead, Write};

fn main() {
  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  let analyzer = Analyzer::with_defaults();

  for line in stdin.lock().lines() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        let _ = writeln!(io::stderr(), "problem-analyzer: read error: {}", e);
        std::process::exit(1);
      }
    };

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    // Parse the request.
    let request: AnalysisRequest = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        let err = ErrorOutput::new(format!("json parse: {}", e));
        let _ = serde_json::to_writer(&mut out, &err);
        let _ = writeln!(out);
        continue;
      }
    };

    // Analyze and render.
    match analyzer.analyze(&request.problems, &request.triggers) {
      Ok(result) => {
        let output = AnalysisOutput {
          analysis_id: result.analysis_id.clone(),
          total_problems: result.total_problems,
          affected_hosts: result.host_problems.len(),
          critical_hosts: result.critical_hosts.len(),
          clusters: result.problem_clusters.len(),
          report: report::render(&result, analyzer.config()),
        };
        let _ = serde_json::to_writer(&mut out, &output);
        let _ = writeln!(out);
      }
      Err(e) => {
        let err = match &e {
          AnalyzerError::Validation { field, reason } => {
            ErrorOutput::new(reason.clone()).with_field(field.clone())
          }
          _ => ErrorOutput::new(e.to_string()),
        };
        let _ = serde_json::to_writer(&mut out, &err);
        let _ = writeln!(out);
      }
    }
  }

  let _ = out.flush();
}
