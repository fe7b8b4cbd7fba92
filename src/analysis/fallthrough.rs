//! Fallthrough detection across case clause boundaries
//!
//! A clause is entered by fallthrough when the preceding clause's block
//! can complete normally. Grouped labels sharing one block (each with an
//! empty body) never flag among themselves; only the transition out of a
//! non-empty, normally-completing block is considered. The diagnostic is
//! suppressed when the comment nearest before the entered clause's label
//! is exactly the configured marker token.

use crate::ast::{block_completes_normally, SwitchStatement};
use crate::diagnostics::{AnalyzerConfig, DiagnosticKind, DiagnosticSink};
use crate::trivia::{is_suppression_marker, TriviaProvider};

pub fn analyze_fallthrough(
    switch: &SwitchStatement,
    trivia: &dyn TriviaProvider,
    config: &AnalyzerConfig,
    sink: &mut DiagnosticSink,
) {
    let Some(severity) = config.possible_fallthrough.active() else {
        return;
    };

    for window in switch.clauses.windows(2) {
        let (previous, entered) = (&window[0], &window[1]);
        if previous.body.is_empty() {
            // grouped labels: `case A: case B:` share one block
            continue;
        }
        if !block_completes_normally(&previous.body) {
            continue;
        }

        let label_range = entered.label_range();
        let suppressed = trivia
            .nearest_preceding_comment(label_range.start)
            .is_some_and(|comment| {
                is_suppression_marker(&comment.text, &config.fallthrough_marker)
            });
        if suppressed {
            log::debug!(
                "fallthrough into label at {}..{} suppressed by marker comment",
                label_range.start,
                label_range.end
            );
            continue;
        }
        sink.report(
            severity,
            DiagnosticKind::PossibleFallthrough,
            label_range,
            format!(
                "Switch case may be entered by falling through previous case. \
                 If intended, add a new comment //{} on the line above",
                config.fallthrough_marker
            ),
        );
    }
}
