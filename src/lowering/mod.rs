//! Dispatch strategy selection and plan construction
//!
//! Lowering turns a validated case set into a [`DispatchPlan`]: the
//! strategy tag, the key-to-target bindings in dispatch-table order, the
//! default target, the null-guard requirement, and (for textual
//! selectors) the two-phase hashed dispatch structure. Lowering never
//! rejects a switch that passed label analysis without structural error.

pub mod emit;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::case_labels::{CaseKey, CaseSet};
use crate::analysis::selector::{needs_null_guard, SelectorKind};
use crate::ast::SwitchStatement;

pub use emit::{CodeEmitter, RecordingEmitter};

/// Dense-index dispatch is chosen while `count * 2.5 > span`, i.e. a
/// direct-indexed table may waste at most 1.5 unused slots per case.
pub const DENSE_SPAN_FACTOR: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchStrategy {
    /// Jump table indexed directly by the (offset) integer key
    DenseIndex,
    /// Content hash first, then an equality chain per hash bucket
    HashedTwoPhase,
    /// Ordered compare-and-branch chain
    LinearChain,
}

/// One `key -> clause` binding, in dispatch-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: i32,
    /// Clause index in declaration order
    pub target: usize,
}

/// One exact-equality comparison inside a hash bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityCheck {
    pub key: String,
    /// Value assigned to the synthetic selector on a match
    pub synthetic_index: i32,
}

/// All cases whose keys share one content hash, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashBucket {
    pub hash: i32,
    pub chain: Vec<EqualityCheck>,
}

/// Phase-1 structure of hashed two-phase dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedDispatch {
    /// Buckets in ascending hash order (the phase-1 table order)
    pub buckets: Vec<HashBucket>,
    /// Synthetic selector value for "no case matched"
    pub default_index: i32,
}

/// Outcome of resolving a runtime selector value against a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Control reaches this clause's body
    Clause(usize),
    /// No case matched and the switch has no default
    NoMatch,
    /// The leading null guard fired before any clause or default body
    NullFault,
}

/// The lowering decision handed to the code emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchPlan {
    pub strategy: DispatchStrategy,
    /// `(key -> clause)` bindings sorted by key; for hashed two-phase
    /// the keys are the synthetic selector values of phase 2
    pub bindings: Vec<KeyBinding>,
    pub default_target: Option<usize>,
    /// Reference-typed selectors get a leading null check raising the
    /// null-selector fault before any body executes
    pub null_guard: bool,
    /// Key bounds of the dense table (meaningful for `DenseIndex`)
    pub min_key: i32,
    pub max_key: i32,
    pub hashed: Option<HashedDispatch>,
}

/// Build the dispatch plan for a validated switch
pub fn build_plan(kind: SelectorKind, switch: &SwitchStatement, cases: &CaseSet) -> DispatchPlan {
    let null_guard = needs_null_guard(&switch.selector.ty);
    match kind {
        SelectorKind::IntegerLike | SelectorKind::Enumeration => {
            build_integer_plan(kind, cases, null_guard)
        }
        SelectorKind::Textual => build_hashed_plan(cases, null_guard),
    }
}

fn build_integer_plan(kind: SelectorKind, cases: &CaseSet, null_guard: bool) -> DispatchPlan {
    let mut bindings: Vec<KeyBinding> = cases
        .entries
        .iter()
        .filter_map(|entry| match &entry.key {
            CaseKey::Int(key) => Some(KeyBinding {
                key: *key,
                target: entry.clause_index,
            }),
            CaseKey::Text(_) => None,
        })
        .collect();
    bindings.sort_by_key(|b| b.key);

    let (min_key, max_key) = match (bindings.first(), bindings.last()) {
        (Some(first), Some(last)) => (first.key, last.key),
        _ => (0, 0),
    };
    let count = bindings.len();
    let span = i64::from(max_key) - i64::from(min_key);
    // enum ordinals are contiguous by construction, always worth a table
    let strategy = if kind == SelectorKind::Enumeration
        || (count as f64) * DENSE_SPAN_FACTOR > span as f64
    {
        DispatchStrategy::DenseIndex
    } else {
        DispatchStrategy::LinearChain
    };
    log::debug!(
        "integer switch: {} cases, span {}, strategy {:?}",
        count,
        span,
        strategy
    );

    DispatchPlan {
        strategy,
        bindings,
        default_target: cases.default_clause,
        null_guard,
        min_key,
        max_key,
        hashed: None,
    }
}

fn build_hashed_plan(cases: &CaseSet, null_guard: bool) -> DispatchPlan {
    let mut buckets: BTreeMap<i32, Vec<EqualityCheck>> = BTreeMap::new();
    let mut bindings = Vec::with_capacity(cases.entries.len());

    for (synthetic_index, entry) in cases.entries.iter().enumerate() {
        let CaseKey::Text(key) = &entry.key else {
            continue;
        };
        let synthetic_index = synthetic_index as i32;
        // insertion order inside a bucket preserves declaration order
        // among colliding keys
        buckets.entry(string_hash(key)).or_default().push(EqualityCheck {
            key: key.clone(),
            synthetic_index,
        });
        bindings.push(KeyBinding {
            key: synthetic_index,
            target: entry.clause_index,
        });
    }

    let default_index = bindings.len() as i32;
    let buckets: Vec<HashBucket> = buckets
        .into_iter()
        .map(|(hash, chain)| HashBucket { hash, chain })
        .collect();
    log::debug!(
        "textual switch: {} cases in {} hash buckets",
        bindings.len(),
        buckets.len()
    );

    DispatchPlan {
        strategy: DispatchStrategy::HashedTwoPhase,
        min_key: 0,
        max_key: default_index.saturating_sub(1),
        bindings,
        default_target: cases.default_clause,
        null_guard,
        hashed: Some(HashedDispatch {
            buckets,
            default_index,
        }),
    }
}

/// The source language's 32-bit string content hash over UTF-16 units
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

impl DispatchPlan {
    /// Resolve a primitive integer selector. The supplier is consumed
    /// exactly once regardless of case count.
    pub fn dispatch_int<F: FnOnce() -> i32>(&self, selector: F) -> DispatchOutcome {
        self.resolve_key(selector())
    }

    /// Resolve a boxed integer selector; `None` models the null value
    /// and trips the leading guard before any body executes.
    pub fn dispatch_boxed_int<F: FnOnce() -> Option<i32>>(&self, selector: F) -> DispatchOutcome {
        match selector() {
            Some(value) => self.resolve_key(value),
            None => DispatchOutcome::NullFault,
        }
    }

    /// Resolve an enumeration selector by ordinal
    pub fn dispatch_ordinal<F: FnOnce() -> Option<u32>>(&self, selector: F) -> DispatchOutcome {
        match selector() {
            Some(ordinal) => self.resolve_key(ordinal as i32),
            None => DispatchOutcome::NullFault,
        }
    }

    /// Resolve a textual selector through both phases. The selector is
    /// evaluated once into a temporary; its content hash is computed on
    /// that temporary only.
    pub fn dispatch_text<F: FnOnce() -> Option<String>>(&self, selector: F) -> DispatchOutcome {
        let Some(content) = selector() else {
            return DispatchOutcome::NullFault;
        };
        let Some(hashed) = &self.hashed else {
            return self.unmatched();
        };
        let hash = string_hash(&content);
        let synthetic = hashed
            .buckets
            .binary_search_by_key(&hash, |bucket| bucket.hash)
            .ok()
            .and_then(|i| {
                hashed.buckets[i]
                    .chain
                    .iter()
                    .find(|check| check.key == content)
            })
            .map(|check| check.synthetic_index)
            .unwrap_or(hashed.default_index);
        self.resolve_key(synthetic)
    }

    fn resolve_key(&self, key: i32) -> DispatchOutcome {
        match self.bindings.binary_search_by_key(&key, |b| b.key) {
            Ok(i) => DispatchOutcome::Clause(self.bindings[i].target),
            Err(_) => self.unmatched(),
        }
    }

    fn unmatched(&self) -> DispatchOutcome {
        match self.default_target {
            Some(clause) => DispatchOutcome::Clause(clause),
            None => DispatchOutcome::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_hash_matches_reference_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        // the classic colliding pair
        assert_eq!(string_hash("Aa"), string_hash("BB"));
    }

    #[test]
    fn dense_threshold_policy() {
        // 4 cases over a span of 9 slots: 4 * 2.5 > 9, still dense
        assert!(4.0 * DENSE_SPAN_FACTOR > 9.0);
        // 4 cases over a span of 10: exactly at the edge, sparse
        assert!(4.0 * DENSE_SPAN_FACTOR <= 10.0);
    }
}
