#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use bsv_ast::{Node, NodeKey, Span, span};
use miette::Diagnostic;
use thiserror::Error;

/// Outcome of checking the tracked constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckResult {
    Unsat,
    Sat,
    Unknown,
}

impl CheckResult {
    pub const LABELS: [&'static str; 3] = ["unsat", "sat", "unknown"];

    pub fn label(self) -> &'static str {
        Self::LABELS[self as usize]
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `<source-unit>:<line>` of the node's first token.
pub fn source_location(node: &Node) -> String {
    format!("{}:{}", node.start.source, node.start.line)
}

#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{location}: {message}")]
#[diagnostic(code(bsv::typecheck))]
pub struct TypeDiagnostic {
    pub message: String,
    pub location: String,
    #[label]
    pub span: Span,
    /// Tracker that put this node in the unsat core.
    pub tracker: Option<String>,
    pub node: Option<NodeKey>,
}

#[derive(Clone, Debug)]
pub struct CheckReport {
    pub result: CheckResult,
    pub diagnostics: Vec<TypeDiagnostic>,
}

impl CheckReport {
    pub fn sat() -> Self {
        Self {
            result: CheckResult::Sat,
            diagnostics: Vec::new(),
        }
    }

    /// The solver gave up; reported so it is never mistaken for success.
    pub fn unknown(reason: Option<String>) -> Self {
        let message = match reason {
            Some(reason) => format!("type check inconclusive: solver returned unknown ({reason})"),
            None => "type check inconclusive: solver returned unknown".to_string(),
        };
        Self {
            result: CheckResult::Unknown,
            diagnostics: vec![TypeDiagnostic {
                message,
                location: "<session>".to_string(),
                span: span(0, 0),
                tracker: None,
                node: None,
            }],
        }
    }

    /// One diagnostic per distinct source node named by the core, in core order.
    /// Nodes are told apart by source unit and id.
    /// Core entries without a tracker (e.g. untracked assertions) are skipped.
    pub fn from_unsat_core<S: AsRef<str>>(core: &[S], trackers: &HashMap<String, Node>) -> Self {
        let mut reported: HashSet<NodeKey> = HashSet::new();
        let mut diagnostics = Vec::new();
        for name in core {
            let name = name.as_ref();
            let Some(node) = trackers.get(name) else {
                tracing::warn!(tracker = name, "unsat core entry has no source node");
                continue;
            };
            if !reported.insert(node.key()) {
                continue;
            }
            let message = if node.text.is_empty() {
                "conflicting type constraint".to_string()
            } else {
                format!("conflicting type constraint on `{}`", node.text)
            };
            diagnostics.push(TypeDiagnostic {
                message,
                location: source_location(node),
                span: node.span,
                tracker: Some(name.to_string()),
                node: Some(node.key()),
            });
        }
        Self {
            result: CheckResult::Unsat,
            diagnostics,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result == CheckResult::Sat
    }

    pub fn locations(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.location.as_str()).collect()
    }
}
