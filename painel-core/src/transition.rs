//! Portal Transitions
//!
//! Sequencing for animated navigation between pages: on a portal link
//! click, the overlay is activated at once and the real navigation happens
//! after a fixed delay that matches the overlay's CSS transition.

use std::cell::Cell;
use std::rc::Rc;

/// Links that get intercepted
pub const PORTAL_SELECTOR: &str = "a[data-portal]";

/// Delay between overlay activation and navigation
pub const FADE_DELAY_MS: u32 = 800;

/// Id of the overlay element created once per page
pub const OVERLAY_ID: &str = "fadeOverlay";

/// Initial overlay style: full viewport, black, transparent, click-through
pub const OVERLAY_STYLE: [(&str, &str); 9] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("background-color", "#000"),
    ("opacity", "0"),
    ("pointer-events", "none"),
    ("transition", "opacity 0.8s ease-in-out"),
];

/// Style applied when a transition starts
pub const OVERLAY_ACTIVE: [(&str, &str); 2] = [("pointer-events", "auto"), ("opacity", "1")];

/// One planned navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub portal: String,
    pub destination: String,
}

impl Transition {
    pub fn begin(portal: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            portal: portal.into(),
            destination: destination.into(),
        }
    }

    /// Overlay properties to set right away
    pub fn overlay_style(&self) -> &'static [(&'static str, &'static str)] {
        &OVERLAY_ACTIVE
    }

    /// Milliseconds to wait before navigating
    pub fn delay_ms(&self) -> u32 {
        FADE_DELAY_MS
    }

    /// Console line written once per transition
    pub fn log_line(&self) -> String {
        format!(
            "🜂 Travessia iniciada: {} → {}",
            self.portal.to_uppercase(),
            self.destination
        )
    }
}

/// What to do with a click while another transition is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Every click schedules its own navigation; the last timer wins
    #[default]
    Allow,
    /// Clicks are dropped until the running transition navigates
    Ignore,
}

/// Tracks in-flight transitions for one page
///
/// Cloned into every click handler; the counter is shared.
#[derive(Debug, Clone, Default)]
pub struct TransitionGate {
    policy: OverlapPolicy,
    in_flight: Rc<Cell<u32>>,
}

impl TransitionGate {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            in_flight: Rc::new(Cell::new(0)),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight.get()
    }

    /// Register a click; `None` means the click must be ignored
    pub fn try_begin(
        &self,
        portal: impl Into<String>,
        destination: impl Into<String>,
    ) -> Option<Transition> {
        if self.policy == OverlapPolicy::Ignore && self.in_flight.get() > 0 {
            return None;
        }
        self.in_flight.set(self.in_flight.get() + 1);
        Some(Transition::begin(portal, destination))
    }

    /// Called when a transition's timer fires
    pub fn complete(&self) {
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
    }
}
