//! Host environment signals.
//!
//! The page (or any embedding host) translates its DOM events into
//! `HostEvent`s and hands them to the coordinator.

use serde::{Deserialize, Serialize};

/// Activity that resets the inactivity countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
}

impl ActivityKind {
    pub const ALL: [Self; 5] = [
        Self::PointerDown,
        Self::PointerMove,
        Self::KeyPress,
        Self::Scroll,
        Self::TouchStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerDown => "pointer_down",
            Self::PointerMove => "pointer_move",
            Self::KeyPress => "key_press",
            Self::Scroll => "scroll",
            Self::TouchStart => "touch_start",
        }
    }
}

/// Viewport geometry at the time of a scroll event, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    /// Distance scrolled from the top of the document
    pub scroll_y: f64,
    /// Total document height
    pub scroll_height: f64,
    /// Visible viewport height
    pub viewport_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            scroll_height,
            viewport_height,
        }
    }

    /// Percentage of the scrollable distance already traversed.
    ///
    /// `None` when the document does not scroll (it fits in the viewport) or
    /// the geometry is not finite.
    pub fn ratio_percent(&self) -> Option<f64> {
        let scrollable = self.scroll_height - self.viewport_height;
        if !scrollable.is_finite() || !self.scroll_y.is_finite() || scrollable <= 0.0 {
            return None;
        }
        Some(self.scroll_y / scrollable * 100.0)
    }
}

/// A raw event from the host page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The viewport scrolled. Also counts as activity.
    Scroll(ScrollPosition),
    /// The pointer left the viewport at vertical position `client_y`.
    PointerLeave { client_y: f64 },
    /// Any other qualifying user activity.
    Activity { kind: ActivityKind },
}

impl HostEvent {
    pub fn scroll(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self::Scroll(ScrollPosition::new(scroll_y, scroll_height, viewport_height))
    }

    pub fn pointer_leave(client_y: f64) -> Self {
        Self::PointerLeave { client_y }
    }

    pub fn activity(kind: ActivityKind) -> Self {
        Self::Activity { kind }
    }

    /// The activity this event represents for the idle countdown, if any.
    ///
    /// A pointer leaving the window is not activity.
    pub fn activity_kind(&self) -> Option<ActivityKind> {
        match self {
            Self::Scroll(_) => Some(ActivityKind::Scroll),
            Self::Activity { kind } => Some(*kind),
            Self::PointerLeave { .. } => None,
        }
    }

    /// Whether a pointer-leave crossed the top edge of the viewport.
    pub fn is_exit_intent(&self) -> bool {
        matches!(self, Self::PointerLeave { client_y } if *client_y <= 0.0)
    }
}
