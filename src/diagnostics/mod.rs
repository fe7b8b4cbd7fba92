//! Structured diagnostics for switch analysis
//!
//! The sink is ordered and append-only: records are reported in clause
//! declaration order and are never merged or reordered. Advisory kinds
//! (missing default, possible fallthrough) carry a configurable severity;
//! structural kinds are always errors.

use serde::{Deserialize, Serialize};

use crate::ast::SourceRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Configured severity for advisory diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdvisorySeverity {
    #[default]
    Off,
    Warning,
    Error,
}

impl AdvisorySeverity {
    pub fn active(self) -> Option<Severity> {
        match self {
            AdvisorySeverity::Off => None,
            AdvisorySeverity::Warning => Some(Severity::Warning),
            AdvisorySeverity::Error => Some(Severity::Error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    UnsupportedSelectorType,
    NonConstantCaseExpression,
    DuplicateCase,
    DuplicateDefault,
    CaseConstantOutOfRange,
    MissingDefault,
    PossibleFallthrough,
}

impl DiagnosticKind {
    /// Structural kinds always prevent lowering of the affected switch
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            DiagnosticKind::UnsupportedSelectorType
                | DiagnosticKind::NonConstantCaseExpression
                | DiagnosticKind::DuplicateCase
                | DiagnosticKind::DuplicateDefault
                | DiagnosticKind::CaseConstantOutOfRange
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub range: SourceRange,
    pub message: String,
}

/// Append-only, ordered diagnostic sink
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    records: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        range: SourceRange,
        message: impl Into<String>,
    ) {
        self.records.push(Diagnostic {
            severity,
            kind,
            range,
            message: message.into(),
        });
    }

    pub fn error(&mut self, kind: DiagnosticKind, range: SourceRange, message: impl Into<String>) {
        self.report(Severity::Error, kind, range, message);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|d| d.severity == Severity::Error)
    }

    /// Errors of structural kinds, which suppress the dispatch plan
    pub fn has_structural_errors(&self) -> bool {
        self.records.iter().any(|d| d.kind.is_structural())
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.kind == kind)
    }
}

/// Hook for the embedder's "treat advisory diagnostics as fatal" policy.
///
/// When an advisory diagnostic is escalated, the embedding compiler may
/// replace codegen of the enclosing method with an unresolved-problem
/// stub; the core only asks, per diagnostic, whether the flagged clause
/// body remains reachable for code generation.
pub trait AdvisoryPolicy {
    fn body_reachable_for_codegen(&self, diagnostic: &Diagnostic) -> bool;
}

/// Default policy: advisory diagnostics never suppress code generation
#[derive(Debug, Default, Clone, Copy)]
pub struct LenientPolicy;

impl AdvisoryPolicy for LenientPolicy {
    fn body_reachable_for_codegen(&self, _diagnostic: &Diagnostic) -> bool {
        true
    }
}

/// Analyzer configuration supplied by the embedding compiler
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub missing_default: AdvisorySeverity,
    pub possible_fallthrough: AdvisorySeverity,
    /// Marker token recognized as a fallthrough suppression comment
    pub fallthrough_marker: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            missing_default: AdvisorySeverity::Off,
            possible_fallthrough: AdvisorySeverity::Warning,
            fallthrough_marker: crate::trivia::FALLTHROUGH_MARKER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceRange;

    /// Policy mirroring "treat advisory diagnostics as fatal": clause
    /// bodies flagged at error severity are replaced by a problem stub.
    struct FatalAdvisories;

    impl AdvisoryPolicy for FatalAdvisories {
        fn body_reachable_for_codegen(&self, diagnostic: &Diagnostic) -> bool {
            diagnostic.kind.is_structural() || diagnostic.severity != Severity::Error
        }
    }

    #[test]
    fn advisory_policy_hook() {
        let range = SourceRange::new(0, 1);
        let advisory = Diagnostic {
            severity: Severity::Error,
            kind: DiagnosticKind::PossibleFallthrough,
            range,
            message: String::new(),
        };
        assert!(LenientPolicy.body_reachable_for_codegen(&advisory));
        assert!(!FatalAdvisories.body_reachable_for_codegen(&advisory));

        let warning = Diagnostic {
            severity: Severity::Warning,
            ..advisory
        };
        assert!(FatalAdvisories.body_reachable_for_codegen(&warning));
    }

    #[test]
    fn sink_preserves_report_order() {
        let mut sink = DiagnosticSink::new();
        sink.error(DiagnosticKind::DuplicateCase, SourceRange::new(10, 11), "a");
        sink.report(
            Severity::Warning,
            DiagnosticKind::PossibleFallthrough,
            SourceRange::new(5, 6),
            "b",
        );
        let kinds: Vec<_> = sink.records().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::DuplicateCase,
                DiagnosticKind::PossibleFallthrough
            ]
        );
    }
}
