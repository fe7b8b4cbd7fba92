//! Switch statement analysis
//!
//! Runs the full pipeline over one switch: selector classification,
//! case label validation, fallthrough detection, and dispatch lowering.
//! Switches are independent; each analysis owns its statement, case set
//! and plan, and shares only the ordered diagnostic sink.

pub mod case_labels;
pub mod definite_assignment;
pub mod fallthrough;
pub mod selector;

use crate::ast::SwitchStatement;
use crate::diagnostics::{AnalyzerConfig, DiagnosticKind, DiagnosticSink};
use crate::error::Result;
use crate::lowering::{self, CodeEmitter, DispatchPlan};
use crate::trivia::TriviaProvider;

pub use case_labels::{CaseEntry, CaseKey, CaseSet};
pub use definite_assignment::{merge_switch, AssignSet, EscapePath, EscapeTarget, SwitchFlowMerge};
pub use selector::SelectorKind;

/// Analysis result for one switch statement
#[derive(Debug)]
pub struct SwitchAnalysis {
    pub selector_kind: Option<SelectorKind>,
    pub cases: CaseSet,
    /// Present only when no structural error affected this switch
    pub plan: Option<DispatchPlan>,
}

/// Analyzer for the switches of one compilation unit
pub struct SwitchAnalyzer<'a> {
    config: AnalyzerConfig,
    trivia: &'a dyn TriviaProvider,
}

impl<'a> SwitchAnalyzer<'a> {
    pub fn new(config: AnalyzerConfig, trivia: &'a dyn TriviaProvider) -> Self {
        Self { config, trivia }
    }

    /// Validate and lower one switch. Structural errors suppress the
    /// plan for this switch only; sibling statements are unaffected.
    pub fn analyze(&self, switch: &SwitchStatement, sink: &mut DiagnosticSink) -> SwitchAnalysis {
        let selector_kind = selector::resolve_selector(&switch.selector, sink);
        let cases = case_labels::analyze_labels(switch, selector_kind, sink);

        if cases.default_clause.is_none() {
            if let Some(severity) = self.config.missing_default.active() {
                sink.report(
                    severity,
                    DiagnosticKind::MissingDefault,
                    switch.range,
                    "The switch statement should have a default case",
                );
            }
        }

        fallthrough::analyze_fallthrough(switch, self.trivia, &self.config, sink);

        let plan = match (selector_kind, cases.structural_error) {
            (Some(kind), false) => Some(lowering::build_plan(kind, switch, &cases)),
            _ => None,
        };
        SwitchAnalysis {
            selector_kind,
            cases,
            plan,
        }
    }

    /// Analyze and, when lowering succeeded, hand the plan to the emitter
    pub fn lower_into(
        &self,
        switch: &SwitchStatement,
        sink: &mut DiagnosticSink,
        emitter: &mut dyn CodeEmitter,
    ) -> Result<SwitchAnalysis> {
        let analysis = self.analyze(switch, sink);
        if let Some(plan) = &analysis.plan {
            emitter.emit_switch(plan)?;
        }
        Ok(analysis)
    }
}
