use promptgate::domain::models::{CoordinatorState, FireOutcome};
use promptgate::{TriggerKind, TriggerPhase};
use proptest::prelude::*;

/// Operations the session task and presentation layer apply to the state.
#[derive(Debug, Clone, Copy)]
enum Op {
    ShowLoad,
    BeginExit,
    Fire(TriggerKind),
    Acknowledge(TriggerKind),
    Suppress(TriggerKind),
    AbandonPending,
}

fn trigger_kind() -> impl Strategy<Value = TriggerKind> {
    prop::sample::select(TriggerKind::ALL.to_vec())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::ShowLoad),
        Just(Op::BeginExit),
        trigger_kind().prop_map(Op::Fire),
        trigger_kind().prop_map(Op::Acknowledge),
        trigger_kind().prop_map(Op::Suppress),
        Just(Op::AbandonPending),
    ]
}

fn apply(state: &mut CoordinatorState, op: Op) {
    match op {
        Op::ShowLoad => {
            state.show_load();
        }
        Op::BeginExit => {
            state.begin_exit_confirmation();
        }
        Op::Fire(kind) => {
            state.fire_behavioral(kind);
        }
        Op::Acknowledge(kind) => {
            state.acknowledge(kind);
        }
        Op::Suppress(kind) => {
            state.suppress(kind);
        }
        Op::AbandonPending => {
            state.abandon_pending();
        }
    }
}

fn claimed(state: &CoordinatorState) -> usize {
    TriggerKind::BEHAVIORAL
        .into_iter()
        .filter(|kind| {
            matches!(
                state.phase(*kind),
                TriggerPhase::Fired | TriggerPhase::Acknowledged
            )
        })
        .count()
}

proptest! {
    /// Property: At most one behavioral prompt is ever shown per session
    ///
    /// `committed` is set exactly when one behavioral trigger has fired.
    #[test]
    fn prop_single_engagement_slot(ops in prop::collection::vec(op(), 0..40)) {
        let mut state = CoordinatorState::new();

        for op in ops {
            apply(&mut state, op);
            let claimed = claimed(&state);
            prop_assert!(claimed <= 1, "two behavioral prompts claimed after {:?}", op);
            prop_assert_eq!(state.is_committed(), claimed == 1);
        }
    }

    /// Property: committed and load_prompt_shown never revert
    #[test]
    fn prop_flags_are_monotonic(ops in prop::collection::vec(op(), 0..40)) {
        let mut state = CoordinatorState::new();
        let mut was_committed = false;
        let mut load_was_shown = false;

        for op in ops {
            apply(&mut state, op);
            prop_assert!(state.is_committed() || !was_committed);
            prop_assert!(state.load_prompt_shown() || !load_was_shown);
            was_committed = state.is_committed();
            load_was_shown = state.load_prompt_shown();
        }
    }

    /// Property: Every phase change follows the trigger lifecycle
    #[test]
    fn prop_phase_changes_are_valid(ops in prop::collection::vec(op(), 0..40)) {
        let mut state = CoordinatorState::new();

        for op in ops {
            let before: Vec<TriggerPhase> =
                TriggerKind::ALL.into_iter().map(|k| state.phase(k)).collect();
            apply(&mut state, op);

            for (kind, old) in TriggerKind::ALL.into_iter().zip(before) {
                let new = state.phase(kind);
                prop_assert!(
                    old == new || old.can_transition_to(new),
                    "{} moved {} -> {} on {:?}", kind, old, new, op
                );
                prop_assert_eq!(state.is_visible(kind), new == TriggerPhase::Fired);
            }
        }
    }

    /// Property: Exit becomes visible only after a confirmation window
    #[test]
    fn prop_exit_requires_confirmation(ops in prop::collection::vec(op(), 0..40)) {
        let mut state = CoordinatorState::new();

        for op in ops {
            let was_pending = state.phase(TriggerKind::Exit) == TriggerPhase::Pending;
            let was_visible = state.is_visible(TriggerKind::Exit);
            apply(&mut state, op);
            if state.is_visible(TriggerKind::Exit) && !was_visible {
                prop_assert!(was_pending);
            }
        }
    }
}

#[test]
fn test_fire_after_commit_is_ignored() {
    let mut state = CoordinatorState::new();
    assert!(matches!(
        state.fire_behavioral(TriggerKind::Inactivity),
        FireOutcome::Fired { abandoned: None }
    ));
    assert_eq!(state.fire_behavioral(TriggerKind::Scroll), FireOutcome::Ignored);
    assert!(state.show_load(), "load stays independent of the slot");
}
