//! Switch selector classification

use serde::{Deserialize, Serialize};

use crate::ast::{SelectorExpr, StaticType};
use crate::diagnostics::{DiagnosticKind, DiagnosticSink};

/// The category a switch dispatches over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorKind {
    /// char, byte, short, int and their boxed forms; keys widen to i32
    IntegerLike,
    /// Keyed by ordinal
    Enumeration,
    /// Keyed by string content
    Textual,
}

/// Classify the selector's static type, or report why it cannot be
/// switched on. Case-label analysis proceeds even on failure so that
/// independently detectable errors inside the body still surface.
pub fn resolve_selector(
    selector: &SelectorExpr,
    sink: &mut DiagnosticSink,
) -> Option<SelectorKind> {
    let kind = match &selector.ty {
        StaticType::Byte
        | StaticType::Char
        | StaticType::Short
        | StaticType::Int
        | StaticType::BoxedByte
        | StaticType::BoxedChar
        | StaticType::BoxedShort
        | StaticType::BoxedInt => Some(SelectorKind::IntegerLike),
        StaticType::Enum { .. } => Some(SelectorKind::Enumeration),
        StaticType::String => Some(SelectorKind::Textual),
        StaticType::Long
        | StaticType::Float
        | StaticType::Double
        | StaticType::Boolean
        | StaticType::Other(_) => None,
    };

    if kind.is_none() {
        sink.error(
            DiagnosticKind::UnsupportedSelectorType,
            selector.range,
            format!(
                "Cannot switch on a value of type {}. \
                 Only convertible int values, strings or enum variables are permitted",
                selector.ty.display_name()
            ),
        );
    }
    kind
}

/// Whether the selected-on value is a reference and needs the leading
/// null guard before any dispatch, even for an empty switch body.
pub fn needs_null_guard(ty: &StaticType) -> bool {
    ty.is_reference()
}
