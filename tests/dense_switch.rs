use jswitch_rs::analysis::SwitchAnalyzer;
use jswitch_rs::ast::{
    CaseClause, CaseLabel, ConstExpr, SelectorExpr, SourceRange, StaticType, Stmt,
    SwitchStatement,
};
use jswitch_rs::diagnostics::{AnalyzerConfig, DiagnosticSink};
use jswitch_rs::lowering::RecordingEmitter;
use jswitch_rs::trivia::NoComments;
use jswitch_rs::{ConstantValue, DispatchOutcome, DispatchPlan, DispatchStrategy};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn at(position: u32) -> SourceRange {
    SourceRange::new(position, position + 8)
}

fn int_clause(value: i32, index: u32) -> CaseClause {
    CaseClause::new(
        [CaseLabel::expr(
            ConstExpr::Lit(ConstantValue::Int(value)),
            at(100 * (index + 1)),
        )],
        vec![Stmt::Break(None)],
    )
}

fn int_switch(ty: StaticType, keys: &[i32], with_default: bool) -> SwitchStatement {
    let mut clauses: Vec<CaseClause> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| int_clause(*key, i as u32))
        .collect();
    if with_default {
        clauses.push(CaseClause::new(
            [CaseLabel::default(at(100 * (keys.len() as u32 + 1)))],
            vec![Stmt::Break(None)],
        ));
    }
    SwitchStatement::new(SelectorExpr::new(ty, at(0)), clauses, SourceRange::new(0, 10_000))
}

fn lower(switch: &SwitchStatement) -> DispatchPlan {
    init_logs();
    let mut sink = DiagnosticSink::new();
    let analysis =
        SwitchAnalyzer::new(AnalyzerConfig::default(), &NoComments).analyze(switch, &mut sink);
    assert!(!sink.has_errors(), "unexpected diagnostics: {:?}", sink.records());
    analysis.plan.expect("switch should lower")
}

#[test]
fn test_contiguous_keys_choose_dense_index() {
    let keys: Vec<i32> = (0..10).collect();
    let plan = lower(&int_switch(StaticType::Int, &keys, true));
    assert_eq!(plan.strategy, DispatchStrategy::DenseIndex);
    assert!(!plan.null_guard);
    assert_eq!((plan.min_key, plan.max_key), (0, 9));

    for key in 0..10 {
        assert_eq!(
            plan.dispatch_int(|| key),
            DispatchOutcome::Clause(key as usize)
        );
    }
    // unmatched selector reaches the default clause
    assert_eq!(plan.dispatch_int(|| 42), DispatchOutcome::Clause(10));
}

#[test]
fn test_sparse_keys_choose_linear_chain() {
    let plan = lower(&int_switch(StaticType::Int, &[0, 1000, 2000], true));
    assert_eq!(plan.strategy, DispatchStrategy::LinearChain);

    assert_eq!(plan.dispatch_int(|| 0), DispatchOutcome::Clause(0));
    assert_eq!(plan.dispatch_int(|| 1000), DispatchOutcome::Clause(1));
    assert_eq!(plan.dispatch_int(|| 2000), DispatchOutcome::Clause(2));
    assert_eq!(plan.dispatch_int(|| 999), DispatchOutcome::Clause(3));
}

#[test]
fn test_span_ratio_crossover() {
    // 4 keys over span 9: 4 * 2.5 = 10 > 9, dense
    let plan = lower(&int_switch(StaticType::Int, &[0, 3, 6, 9], false));
    assert_eq!(plan.strategy, DispatchStrategy::DenseIndex);

    // 4 keys over span 10: 10 > 10 fails, linear
    let plan = lower(&int_switch(StaticType::Int, &[0, 3, 6, 10], false));
    assert_eq!(plan.strategy, DispatchStrategy::LinearChain);
}

#[test]
fn test_bindings_sorted_by_key_not_declaration_order() {
    let plan = lower(&int_switch(StaticType::Int, &[5, 1, 3], false));
    let keys: Vec<i32> = plan.bindings.iter().map(|b| b.key).collect();
    assert_eq!(keys, vec![1, 3, 5]);
    // targets still point at the declaring clauses
    assert_eq!(plan.dispatch_int(|| 5), DispatchOutcome::Clause(0));
    assert_eq!(plan.dispatch_int(|| 1), DispatchOutcome::Clause(1));
}

#[test]
fn test_char_selector_keys_widen_to_int() {
    let switch = SwitchStatement::new(
        SelectorExpr::new(StaticType::Char, at(0)),
        vec![
            CaseClause::new(
                [CaseLabel::expr(
                    ConstExpr::Lit(ConstantValue::Char(b'a' as u16)),
                    at(100),
                )],
                vec![Stmt::Break(None)],
            ),
            CaseClause::new(
                [CaseLabel::expr(
                    ConstExpr::Lit(ConstantValue::Char(b'b' as u16)),
                    at(200),
                )],
                vec![Stmt::Break(None)],
            ),
        ],
        SourceRange::new(0, 1000),
    );
    let plan = lower(&switch);
    assert_eq!(plan.dispatch_int(|| i32::from(b'b')), DispatchOutcome::Clause(1));
}

#[test]
fn test_enumeration_always_dense() {
    let ty = StaticType::Enum {
        name: "Color".into(),
        variant_count: 3,
    };
    let switch = SwitchStatement::new(
        SelectorExpr::new(ty, at(0)),
        vec![
            CaseClause::new(
                [CaseLabel::expr(
                    ConstExpr::EnumVariant {
                        name: "RED".into(),
                        ordinal: 0,
                    },
                    at(100),
                )],
                vec![Stmt::Break(None)],
            ),
            CaseClause::new(
                [CaseLabel::expr(
                    ConstExpr::EnumVariant {
                        name: "BLUE".into(),
                        ordinal: 2,
                    },
                    at(200),
                )],
                vec![Stmt::Break(None)],
            ),
        ],
        SourceRange::new(0, 1000),
    );
    let plan = lower(&switch);
    assert_eq!(plan.strategy, DispatchStrategy::DenseIndex);
    assert!(plan.null_guard);

    assert_eq!(plan.dispatch_ordinal(|| Some(2)), DispatchOutcome::Clause(1));
    assert_eq!(plan.dispatch_ordinal(|| Some(1)), DispatchOutcome::NoMatch);
    assert_eq!(plan.dispatch_ordinal(|| None), DispatchOutcome::NullFault);
}

#[test]
fn test_boxed_selector_null_guard() {
    let plan = lower(&int_switch(StaticType::BoxedInt, &[1, 2], true));
    assert!(plan.null_guard);
    assert_eq!(plan.dispatch_boxed_int(|| None), DispatchOutcome::NullFault);
    assert_eq!(
        plan.dispatch_boxed_int(|| Some(2)),
        DispatchOutcome::Clause(1)
    );

    // even a switch with zero clauses evaluates the guard first
    let empty = int_switch(StaticType::BoxedInt, &[], false);
    let plan = lower(&empty);
    assert!(plan.null_guard);
    assert_eq!(plan.dispatch_boxed_int(|| None), DispatchOutcome::NullFault);
    assert_eq!(plan.dispatch_boxed_int(|| Some(7)), DispatchOutcome::NoMatch);
}

#[test]
fn test_emitter_failure_propagates() {
    // an emitter rejecting the plan surfaces as Error::Emit from lower_into
    struct RefusingEmitter;

    impl jswitch_rs::lowering::CodeEmitter for RefusingEmitter {
        fn emit_switch(&mut self, _plan: &DispatchPlan) -> jswitch_rs::Result<()> {
            Err(jswitch_rs::Error::emit("method body too large"))
        }
    }

    let analyzer = SwitchAnalyzer::new(AnalyzerConfig::default(), &NoComments);
    let mut sink = DiagnosticSink::new();
    let result = analyzer.lower_into(
        &int_switch(StaticType::Int, &[1, 2], true),
        &mut sink,
        &mut RefusingEmitter,
    );
    assert!(matches!(result, Err(jswitch_rs::Error::Emit { .. })));
}

#[test]
fn test_lowering_hands_plan_to_emitter() {
    let analyzer = SwitchAnalyzer::new(AnalyzerConfig::default(), &NoComments);
    let mut sink = DiagnosticSink::new();
    let mut emitter = RecordingEmitter::new();

    let good = int_switch(StaticType::Int, &[1, 2], true);
    analyzer
        .lower_into(&good, &mut sink, &mut emitter)
        .expect("emission");
    assert_eq!(emitter.plans.len(), 1);

    // a structurally broken switch reports but emits nothing, and does
    // not disturb analysis of the sibling above
    let broken = int_switch(StaticType::Int, &[3, 3], true);
    analyzer
        .lower_into(&broken, &mut sink, &mut emitter)
        .expect("analysis still succeeds");
    assert_eq!(emitter.plans.len(), 1);
    assert!(sink.has_structural_errors());
}
