//! Minimal AST surface consumed from the typing collaborator
//!
//! Only the shapes the switch analysis needs are modeled here: a typed
//! selector expression, case clauses with constant-bearing label
//! expressions, and a small statement vocabulary sufficient for
//! fallthrough and definite-assignment analysis. Full expression and
//! statement trees live in the embedding front end.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constant::ConstantValue;

/// Half-open source offset range attached to labels, clauses and statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: u32,
    pub end: u32,
}

impl SourceRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// The resolved static type of a switch selector expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticType {
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    BoxedByte,
    BoxedChar,
    BoxedShort,
    BoxedInt,
    String,
    Enum { name: String, variant_count: u32 },
    Other(String),
}

impl StaticType {
    /// Human-readable type name for diagnostics
    pub fn display_name(&self) -> String {
        match self {
            StaticType::Byte => "byte".into(),
            StaticType::Char => "char".into(),
            StaticType::Short => "short".into(),
            StaticType::Int => "int".into(),
            StaticType::Long => "long".into(),
            StaticType::Float => "float".into(),
            StaticType::Double => "double".into(),
            StaticType::Boolean => "boolean".into(),
            StaticType::BoxedByte => "java.lang.Byte".into(),
            StaticType::BoxedChar => "java.lang.Character".into(),
            StaticType::BoxedShort => "java.lang.Short".into(),
            StaticType::BoxedInt => "java.lang.Integer".into(),
            StaticType::String => "java.lang.String".into(),
            StaticType::Enum { name, .. } => name.clone(),
            StaticType::Other(name) => name.clone(),
        }
    }

    /// Reference types require the leading null guard when switched on
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            StaticType::BoxedByte
                | StaticType::BoxedChar
                | StaticType::BoxedShort
                | StaticType::BoxedInt
                | StaticType::String
                | StaticType::Enum { .. }
                | StaticType::Other(_)
        )
    }
}

/// A constant-bearing label expression, already name-resolved by the
/// front end but not yet folded.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    /// A literal or an already-folded constant-qualified reference
    Lit(ConstantValue),
    /// The `null` literal. Legal as an expression, never as a case label.
    Null,
    /// Compile-time string concatenation
    Concat(Box<ConstExpr>, Box<ConstExpr>),
    /// Reference to an enumeration constant
    EnumVariant { name: String, ordinal: u32 },
    /// A name that did not resolve to a compile-time constant
    NonConstant(String),
}

impl ConstExpr {
    /// Fold this expression to a [`ConstantValue`].
    ///
    /// Anything not foldable at compile time (including the `null`
    /// literal and enum constants, which are keyed by ordinal rather
    /// than by folded value) yields `NotAConstant`.
    pub fn fold(&self) -> ConstantValue {
        match self {
            ConstExpr::Lit(value) => value.clone(),
            ConstExpr::Null => ConstantValue::NotAConstant,
            ConstExpr::Concat(left, right) => {
                let (left, right) = (left.fold(), right.fold());
                if !left.is_constant() || !right.is_constant() {
                    return ConstantValue::NotAConstant;
                }
                match (left.string_value(), right.string_value()) {
                    (Ok(Some(l)), Ok(Some(r))) => {
                        let mut folded = l;
                        folded.push_str(&r);
                        ConstantValue::String(Some(folded))
                    }
                    // concatenation with a null-valued operand is not a
                    // compile-time constant
                    _ => ConstantValue::NotAConstant,
                }
            }
            ConstExpr::EnumVariant { .. } => ConstantValue::NotAConstant,
            ConstExpr::NonConstant(_) => ConstantValue::NotAConstant,
        }
    }
}

/// One `case`/`default` label
#[derive(Debug, Clone, PartialEq)]
pub struct CaseLabel {
    pub kind: CaseLabelKind,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabelKind {
    Expr(ConstExpr),
    Default,
}

impl CaseLabel {
    pub fn expr(expr: ConstExpr, range: SourceRange) -> Self {
        Self {
            kind: CaseLabelKind::Expr(expr),
            range,
        }
    }

    pub fn default(range: SourceRange) -> Self {
        Self {
            kind: CaseLabelKind::Default,
            range,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self.kind, CaseLabelKind::Default)
    }
}

/// Index of a local variable in the enclosing method's frame
pub type LocalId = u32;

/// Statement vocabulary for flow analysis inside case bodies
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Assignment to a local variable
    Assign(LocalId),
    /// `break;` or `break label;`
    Break(Option<String>),
    /// `continue;` or `continue label;`
    Continue(Option<String>),
    Return,
    Throw,
    /// Any statement with no effect on flow or assignment state
    Expr,
    Block(Vec<Stmt>),
}

impl Stmt {
    /// Whether this statement unconditionally transfers control away,
    /// so the enclosing sequence cannot complete normally past it.
    pub fn ends_abruptly(&self) -> bool {
        match self {
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Return | Stmt::Throw => true,
            Stmt::Block(body) => !block_completes_normally(body),
            Stmt::Assign(_) | Stmt::Expr => false,
        }
    }
}

/// A statement sequence completes normally unless its last statement
/// unconditionally exits.
pub fn block_completes_normally(body: &[Stmt]) -> bool {
    match body.last() {
        Some(stmt) => !stmt.ends_abruptly(),
        None => true,
    }
}

/// One group of labels sharing a statement block
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub labels: SmallVec<[CaseLabel; 2]>,
    pub body: Vec<Stmt>,
    pub body_range: SourceRange,
}

impl CaseClause {
    pub fn new(labels: impl IntoIterator<Item = CaseLabel>, body: Vec<Stmt>) -> Self {
        let labels: SmallVec<[CaseLabel; 2]> = labels.into_iter().collect();
        let body_range = labels
            .last()
            .map(|l| SourceRange::new(l.range.end, l.range.end))
            .unwrap_or(SourceRange::new(0, 0));
        Self {
            labels,
            body,
            body_range,
        }
    }

    pub fn has_default(&self) -> bool {
        self.labels.iter().any(CaseLabel::is_default)
    }

    /// Source range of the first label, used as the clause's anchor
    pub fn label_range(&self) -> SourceRange {
        self.labels
            .first()
            .map(|l| l.range)
            .unwrap_or(self.body_range)
    }
}

/// The typed selector expression of a switch
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub ty: StaticType,
    pub range: SourceRange,
}

impl SelectorExpr {
    pub fn new(ty: StaticType, range: SourceRange) -> Self {
        Self { ty, range }
    }
}

/// A switch statement as handed over by the front end
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub selector: SelectorExpr,
    pub clauses: Vec<CaseClause>,
    pub range: SourceRange,
    /// Statement label, the target of `break label;` aimed at this switch
    pub label: Option<String>,
}

impl SwitchStatement {
    pub fn new(selector: SelectorExpr, clauses: Vec<CaseClause>, range: SourceRange) -> Self {
        Self {
            selector,
            clauses,
            range,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn default_clause(&self) -> Option<usize> {
        self.clauses.iter().position(CaseClause::has_default)
    }
}
