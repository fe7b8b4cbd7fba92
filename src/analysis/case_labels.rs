//! Case label validation and key extraction
//!
//! Folds every label expression to a [`ConstantValue`], maps it to the
//! dispatch key matching the selector category, and reports duplicate
//! keys, duplicate defaults, non-constant labels and out-of-range
//! constants. Diagnostics attach to the label source range, never to
//! the clause body.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::{CaseLabelKind, ConstExpr, SourceRange, StaticType, SwitchStatement};
use crate::constant::ConstantValue;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink};

use super::selector::SelectorKind;

/// Canonical dispatch key for one case label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseKey {
    /// Widened integer for integer-like selectors, ordinal for enums
    Int(i32),
    /// Raw string content for textual selectors
    Text(String),
}

/// One validated case label with its resolved key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseEntry {
    pub key: CaseKey,
    /// Index of the owning clause in declaration order
    pub clause_index: usize,
    /// Position of this label among all non-default labels, in
    /// declaration order
    pub declaration_index: usize,
    pub label_range: SourceRange,
}

/// The validated, keyed case set of one switch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSet {
    pub entries: Vec<CaseEntry>,
    pub default_clause: Option<usize>,
    /// Set when any structural error was reported for this switch
    pub structural_error: bool,
}

/// Validate all case labels of a switch against the resolved selector
/// kind. When the selector itself failed to resolve (`kind` is `None`),
/// labels are still folded so non-constant expressions get reported,
/// but no keys are collected.
pub fn analyze_labels(
    switch: &SwitchStatement,
    kind: Option<SelectorKind>,
    sink: &mut DiagnosticSink,
) -> CaseSet {
    let mut set = CaseSet {
        structural_error: kind.is_none(),
        ..CaseSet::default()
    };
    let mut seen: HashMap<CaseKey, usize> = HashMap::new();
    let mut declaration_index = 0usize;

    for (clause_index, clause) in switch.clauses.iter().enumerate() {
        for label in &clause.labels {
            let expr = match &label.kind {
                CaseLabelKind::Default => {
                    if set.default_clause.is_some() {
                        set.structural_error = true;
                        sink.error(
                            DiagnosticKind::DuplicateDefault,
                            label.range,
                            "The default case is already defined",
                        );
                    } else {
                        set.default_clause = Some(clause_index);
                    }
                    continue;
                }
                CaseLabelKind::Expr(expr) => expr,
            };

            let key = match kind {
                Some(SelectorKind::IntegerLike) => {
                    integer_key(expr, &switch.selector.ty, label.range, &mut set, sink)
                }
                Some(SelectorKind::Enumeration) => {
                    enum_key(expr, label.range, &mut set, sink)
                }
                Some(SelectorKind::Textual) => {
                    text_key(expr, &switch.selector.ty, label.range, &mut set, sink)
                }
                None => {
                    // defensive pass: surface secondary errors even
                    // though the selector was rejected
                    if !expr.fold().is_constant() {
                        report_non_constant(label.range, &mut set, sink);
                    }
                    None
                }
            };

            let Some(key) = key else { continue };

            if let Some(first) = seen.get(&key) {
                log::debug!(
                    "duplicate case key {:?} (first declared at label #{})",
                    key,
                    first
                );
                set.structural_error = true;
                sink.error(DiagnosticKind::DuplicateCase, label.range, "Duplicate case");
                continue;
            }
            seen.insert(key.clone(), declaration_index);
            set.entries.push(CaseEntry {
                key,
                clause_index,
                declaration_index,
                label_range: label.range,
            });
            declaration_index += 1;
        }
    }
    set
}

fn report_non_constant(range: SourceRange, set: &mut CaseSet, sink: &mut DiagnosticSink) {
    set.structural_error = true;
    sink.error(
        DiagnosticKind::NonConstantCaseExpression,
        range,
        "case expressions must be constant expressions",
    );
}

fn report_incompatible(
    value: &ConstantValue,
    selector_ty: &StaticType,
    range: SourceRange,
    set: &mut CaseSet,
    sink: &mut DiagnosticSink,
) {
    set.structural_error = true;
    sink.error(
        DiagnosticKind::CaseConstantOutOfRange,
        range,
        format!(
            "Case constant {} is incompatible with switch selector type {}",
            value,
            selector_ty.display_name()
        ),
    );
}

/// Fold and widen an integer-like case constant, checking that it fits
/// the selector's own range (e.g. `case 300:` on a byte selector).
fn integer_key(
    expr: &ConstExpr,
    selector_ty: &StaticType,
    range: SourceRange,
    set: &mut CaseSet,
    sink: &mut DiagnosticSink,
) -> Option<CaseKey> {
    let value = expr.fold();
    if !value.is_constant() {
        report_non_constant(range, set, sink);
        return None;
    }
    match value {
        ConstantValue::Byte(_)
        | ConstantValue::Char(_)
        | ConstantValue::Short(_)
        | ConstantValue::Int(_) => {
            let widened = value.int_value().ok()?;
            if !fits_selector_range(selector_ty, widened) {
                report_incompatible(&value, selector_ty, range, set, sink);
                return None;
            }
            Some(CaseKey::Int(widened))
        }
        other => {
            report_incompatible(&other, selector_ty, range, set, sink);
            None
        }
    }
}

fn enum_key(
    expr: &ConstExpr,
    range: SourceRange,
    set: &mut CaseSet,
    sink: &mut DiagnosticSink,
) -> Option<CaseKey> {
    match expr {
        ConstExpr::EnumVariant { ordinal, .. } => Some(CaseKey::Int(*ordinal as i32)),
        _ => {
            report_non_constant(range, set, sink);
            None
        }
    }
}

fn text_key(
    expr: &ConstExpr,
    selector_ty: &StaticType,
    range: SourceRange,
    set: &mut CaseSet,
    sink: &mut DiagnosticSink,
) -> Option<CaseKey> {
    let value = expr.fold();
    if !value.is_constant() {
        report_non_constant(range, set, sink);
        return None;
    }
    match value {
        ConstantValue::String(Some(content)) => Some(CaseKey::Text(content)),
        // a null-valued string constant collides with the null-selector
        // fault path and is never a valid label
        ConstantValue::String(None) => {
            report_non_constant(range, set, sink);
            None
        }
        other => {
            report_incompatible(&other, selector_ty, range, set, sink);
            None
        }
    }
}

fn fits_selector_range(ty: &StaticType, key: i32) -> bool {
    match ty {
        StaticType::Byte | StaticType::BoxedByte => {
            key >= i32::from(i8::MIN) && key <= i32::from(i8::MAX)
        }
        StaticType::Char | StaticType::BoxedChar => (0..=0xFFFF).contains(&key),
        StaticType::Short | StaticType::BoxedShort => {
            key >= i32::from(i16::MIN) && key <= i32::from(i16::MAX)
        }
        _ => true,
    }
}
