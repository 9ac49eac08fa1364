//! Trigger domain model.
//!
//! A trigger is one of the four signal sources that can request an
//! engagement prompt. Scroll, Exit and Inactivity are "behavioral" and share
//! a single arbitration slot per session; Load is independent of it.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed delay between session start and the load prompt.
pub const LOAD_PROMPT_DELAY: Duration = Duration::from_millis(2000);

/// The signal source behind an engagement prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Page-load elapsed time
    Load,
    /// Vertical scroll depth
    Scroll,
    /// Pointer leaving the viewport across its top edge
    Exit,
    /// Continuous user inactivity
    Inactivity,
}

impl TriggerKind {
    /// Every kind, in slot order.
    pub const ALL: [Self; 4] = [Self::Load, Self::Scroll, Self::Exit, Self::Inactivity];

    /// Kinds competing for the single engagement slot.
    pub const BEHAVIORAL: [Self; 3] = [Self::Scroll, Self::Exit, Self::Inactivity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Scroll => "scroll",
            Self::Exit => "exit",
            Self::Inactivity => "inactivity",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "load" => Some(Self::Load),
            "scroll" => Some(Self::Scroll),
            "exit" | "exit_intent" => Some(Self::Exit),
            "inactivity" | "idle" => Some(Self::Inactivity),
            _ => None,
        }
    }

    /// Whether this kind is gated by the session's `committed` flag.
    pub fn is_behavioral(&self) -> bool {
        !matches!(self, Self::Load)
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Load => 0,
            Self::Scroll => 1,
            Self::Exit => 2,
            Self::Inactivity => 3,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle phase of a single trigger within one session.
///
/// `Armed -> Pending (exit only) -> Fired -> Acknowledged`. `Suppressed` is
/// terminal for triggers that can no longer fire: the load prompt was
/// dismissed on an earlier visit, another behavioral trigger won the slot, or
/// a pending exit confirmation was abandoned at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPhase {
    Armed,
    Pending,
    Fired,
    Acknowledged,
    Suppressed,
}

impl Default for TriggerPhase {
    fn default() -> Self {
        Self::Armed
    }
}

impl TriggerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armed => "armed",
            Self::Pending => "pending",
            Self::Fired => "fired",
            Self::Acknowledged => "acknowledged",
            Self::Suppressed => "suppressed",
        }
    }

    /// The trigger can still become visible this session.
    pub fn can_fire(&self) -> bool {
        matches!(self, Self::Armed | Self::Pending)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(&self) -> Vec<TriggerPhase> {
        match self {
            Self::Armed => vec![Self::Pending, Self::Fired, Self::Suppressed],
            Self::Pending => vec![Self::Fired, Self::Suppressed],
            Self::Fired => vec![Self::Acknowledged],
            Self::Acknowledged | Self::Suppressed => vec![],
        }
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for TriggerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
