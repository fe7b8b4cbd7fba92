//! Definite-assignment merge at the end of a switch
//!
//! A local is definitely assigned after the switch only when it is
//! assigned on every path that can reach the following statement. Paths
//! escaping to an enclosing construct (labeled break, continue) leave
//! the switch's own merge and are handed back for the enclosing
//! construct's merge point.

use std::collections::BTreeSet;

use crate::ast::{LocalId, Stmt, SwitchStatement};

/// Set of locals known to be assigned on one path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignSet(BTreeSet<LocalId>);

impl AssignSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(locals: impl IntoIterator<Item = LocalId>) -> Self {
        Self(locals.into_iter().collect())
    }

    pub fn insert(&mut self, local: LocalId) {
        self.0.insert(local);
    }

    pub fn contains(&self, local: LocalId) -> bool {
        self.0.contains(&local)
    }

    /// Merge of two in-edges: assigned only if assigned on both
    pub fn intersect(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0).copied().collect())
    }
}

/// Where a path escaping the switch is accounted for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeTarget {
    /// `break label;` aimed at an enclosing labeled construct
    LabeledBreak(String),
    /// `continue;` / `continue label;` aimed at an enclosing loop
    Continue(Option<String>),
}

/// One path that left the switch toward an enclosing construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapePath {
    pub target: EscapeTarget,
    pub state: AssignSet,
}

/// Result of the post-switch merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchFlowMerge {
    /// Assignment state at the statement following the switch;
    /// `None` when no path falls out the bottom.
    pub after_switch: Option<AssignSet>,
    /// Paths to be merged at enclosing constructs, in flow order
    pub escapes: Vec<EscapePath>,
}

impl SwitchFlowMerge {
    pub fn definitely_assigned(&self, local: LocalId) -> bool {
        self.after_switch
            .as_ref()
            .is_some_and(|state| state.contains(local))
    }
}

struct MergeCtx {
    exit_states: Vec<AssignSet>,
    escapes: Vec<EscapePath>,
}

/// Compute the definite-assignment state after a switch, given the
/// state on entry.
pub fn merge_switch(switch: &SwitchStatement, entry: &AssignSet) -> SwitchFlowMerge {
    let mut ctx = MergeCtx {
        exit_states: Vec::new(),
        escapes: Vec::new(),
    };

    let mut fall_in: Option<AssignSet> = None;
    for clause in &switch.clauses {
        // a labeled clause is reachable directly from dispatch with the
        // pre-switch state, and by fallthrough from its predecessor
        let clause_entry = match fall_in.take() {
            Some(fallen) => fallen.intersect(entry),
            None => entry.clone(),
        };
        fall_in = exec_block(&clause.body, clause_entry, switch.label.as_deref(), &mut ctx);
    }
    if let Some(bottom) = fall_in {
        ctx.exit_states.push(bottom);
    }
    // without a default, an unmatched selector skips every clause, so
    // the merge can never be stronger than the entry state
    if switch.default_clause().is_none() {
        ctx.exit_states.push(entry.clone());
    }

    let after_switch = ctx
        .exit_states
        .into_iter()
        .reduce(|merged, next| merged.intersect(&next));
    SwitchFlowMerge {
        after_switch,
        escapes: ctx.escapes,
    }
}

/// Run a statement sequence, returning the state on normal completion
/// or `None` when every path exits abruptly.
fn exec_block(
    body: &[Stmt],
    mut state: AssignSet,
    switch_label: Option<&str>,
    ctx: &mut MergeCtx,
) -> Option<AssignSet> {
    for stmt in body {
        match stmt {
            Stmt::Assign(local) => state.insert(*local),
            Stmt::Expr => {}
            Stmt::Block(inner) => {
                state = exec_block(inner, state, switch_label, ctx)?;
            }
            Stmt::Break(label) => {
                let targets_switch = match label.as_deref() {
                    None => true,
                    Some(l) => Some(l) == switch_label,
                };
                if targets_switch {
                    ctx.exit_states.push(state);
                } else {
                    ctx.escapes.push(EscapePath {
                        target: EscapeTarget::LabeledBreak(
                            label.clone().unwrap_or_default(),
                        ),
                        state,
                    });
                }
                return None;
            }
            Stmt::Continue(label) => {
                ctx.escapes.push(EscapePath {
                    target: EscapeTarget::Continue(label.clone()),
                    state,
                });
                return None;
            }
            Stmt::Return | Stmt::Throw => return None,
        }
    }
    Some(state)
}
