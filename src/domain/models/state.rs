//! Session-scoped arbitration state.
//!
//! `CoordinatorState` is a pure state machine: it knows nothing about timers
//! or the host page. The coordinator feeds it observer outcomes and reads
//! back visibility. Invariants held here:
//!
//! - at most one behavioral trigger ever becomes visible per session;
//! - the load trigger never reads or writes `committed`;
//! - a visible flag is cleared only by acknowledging the same kind;
//! - once `committed`, behavioral triggers have no further effect.

use serde::{Deserialize, Serialize};

use super::trigger::{TriggerKind, TriggerPhase};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TriggerSlot {
    phase: TriggerPhase,
    visible: bool,
}

/// Result of asking a behavioral trigger to claim the engagement slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The trigger became visible and committed the session.
    Fired {
        /// A trigger that was mid-confirmation and lost the slot.
        abandoned: Option<TriggerKind>,
    },
    /// The slot was already taken or the trigger is not armed.
    Ignored,
}

impl FireOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }
}

/// Arbitration state for one page session.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorState {
    committed: bool,
    load_prompt_shown: bool,
    slots: [TriggerSlot; 4],
}

impl CoordinatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a behavioral trigger has claimed the engagement slot.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// True once the load prompt has been presented this session.
    pub fn load_prompt_shown(&self) -> bool {
        self.load_prompt_shown
    }

    pub fn is_visible(&self, kind: TriggerKind) -> bool {
        self.slots[kind.slot()].visible
    }

    pub fn phase(&self, kind: TriggerKind) -> TriggerPhase {
        self.slots[kind.slot()].phase
    }

    /// Disarm a trigger that has not fired yet. Returns whether it changed.
    pub fn suppress(&mut self, kind: TriggerKind) -> bool {
        let slot = &mut self.slots[kind.slot()];
        if !slot.phase.can_fire() {
            return false;
        }
        slot.phase = TriggerPhase::Suppressed;
        true
    }

    /// Present the load prompt. Never touches `committed`.
    pub fn show_load(&mut self) -> bool {
        let slot = &mut self.slots[TriggerKind::Load.slot()];
        if slot.phase != TriggerPhase::Armed {
            return false;
        }
        slot.phase = TriggerPhase::Fired;
        slot.visible = true;
        self.load_prompt_shown = true;
        true
    }

    /// Move the exit trigger into its confirmation window.
    ///
    /// Returns false when the session is committed or a confirmation is
    /// already running; the caller must not start another timer then.
    pub fn begin_exit_confirmation(&mut self) -> bool {
        if self.committed {
            return false;
        }
        let slot = &mut self.slots[TriggerKind::Exit.slot()];
        if slot.phase != TriggerPhase::Armed {
            return false;
        }
        slot.phase = TriggerPhase::Pending;
        true
    }

    /// Claim the engagement slot for a behavioral trigger.
    ///
    /// The guard is evaluated and the slot taken under the same borrow, so the
    /// first caller wins no matter which observer it comes from.
    pub fn fire_behavioral(&mut self, kind: TriggerKind) -> FireOutcome {
        if !kind.is_behavioral() || self.committed {
            return FireOutcome::Ignored;
        }
        let slot = &mut self.slots[kind.slot()];
        if !slot.phase.can_fire() {
            return FireOutcome::Ignored;
        }
        // Exit only fires after its confirmation window.
        if kind == TriggerKind::Exit && slot.phase != TriggerPhase::Pending {
            return FireOutcome::Ignored;
        }
        slot.phase = TriggerPhase::Fired;
        slot.visible = true;
        self.committed = true;

        let mut abandoned = None;
        for other in TriggerKind::BEHAVIORAL {
            if other == kind {
                continue;
            }
            let was_pending = self.phase(other) == TriggerPhase::Pending;
            if self.suppress(other) && was_pending {
                abandoned = Some(other);
            }
        }
        FireOutcome::Fired { abandoned }
    }

    /// Drop a running confirmation window, e.g. at teardown.
    pub fn abandon_pending(&mut self) -> Option<TriggerKind> {
        let kind = TriggerKind::ALL
            .into_iter()
            .find(|k| self.phase(*k) == TriggerPhase::Pending)?;
        self.slots[kind.slot()].phase = TriggerPhase::Suppressed;
        Some(kind)
    }

    /// Hide the prompt for `kind`. Returns whether visibility changed.
    ///
    /// `committed` is left untouched.
    pub fn acknowledge(&mut self, kind: TriggerKind) -> bool {
        let slot = &mut self.slots[kind.slot()];
        if !slot.visible {
            return false;
        }
        slot.visible = false;
        slot.phase = TriggerPhase::Acknowledged;
        true
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            committed: self.committed,
            load_prompt_shown: self.load_prompt_shown,
            triggers: TriggerKind::ALL
                .into_iter()
                .map(|kind| TriggerStatus {
                    kind,
                    phase: self.phase(kind),
                    visible: self.is_visible(kind),
                })
                .collect(),
        }
    }
}

/// Point-in-time view of one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerStatus {
    pub kind: TriggerKind,
    pub phase: TriggerPhase,
    pub visible: bool,
}

/// Serializable copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub committed: bool,
    pub load_prompt_shown: bool,
    pub triggers: Vec<TriggerStatus>,
}

impl CoordinatorSnapshot {
    pub fn status(&self, kind: TriggerKind) -> Option<&TriggerStatus> {
        self.triggers.iter().find(|t| t.kind == kind)
    }

    /// Kinds currently visible, in slot order.
    pub fn visible(&self) -> Vec<TriggerKind> {
        self.triggers
            .iter()
            .filter(|t| t.visible)
            .map(|t| t.kind)
            .collect()
    }
}
