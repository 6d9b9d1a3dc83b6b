//! Page state: sidebar, section navigation and the loading reveal.
//!
//! The loading sequence is a fixed schedule. `Navigator::tick` is called once
//! per second while loading; after [`LOADING_SECS`] ticks the results view
//! is shown with every section revealed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::logging::{debug, obj, Domain};

/// Viewport width at or below which the sidebar uses the mobile overlay.
pub const MOBILE_BREAKPOINT: u32 = 768;
pub const LOADING_SECS: u32 = 7;
pub const RESULT_SECTIONS: usize = 4;

pub const LOADING_MESSAGES: [&str; 7] = [
    "Connecting to Database...",
    "Fetching Logistics Data...",
    "Analyzing Delivery Routes...",
    "Calculating Delay Metrics...",
    "Correlating Weight vs. Time...",
    "Generating Visualizations...",
    "Finalizing Report...",
];

/// Sections revealed when the loading step reaches the given value.
const REVEAL_SCHEDULE: [(u32, &[usize]); 3] = [(2, &[0]), (4, &[1]), (6, &[2, 3])];

pub fn is_mobile(width: u32) -> bool {
    width <= MOBILE_BREAKPOINT
}

/// `from`/`to` fields for a state change; `None` when nothing changed.
fn transition_fields<T: Serialize + PartialEq>(from: &T, to: &T) -> Option<Map<String, Value>> {
    if from == to {
        return None;
    }
    let state = |s: &T| serde_json::to_value(s).unwrap_or(Value::Null);
    Some(obj(&[("from", state(from)), ("to", state(to))]))
}

fn log_transition<T: Serialize + PartialEq>(event: &str, from: &T, to: &T) {
    if let Some(fields) = transition_fields(from, to) {
        debug(Domain::Ui, event, fields);
    }
}

// =============================================================================
// Sidebar
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sidebar {
    #[default]
    Expanded,
    Collapsed,
    MobileClosed,
    MobileOpen,
}

impl Sidebar {
    pub fn toggle(self, width: u32) -> Self {
        let next = self.toggled(width);
        log_transition("sidebar", &self, &next);
        next
    }

    fn toggled(self, width: u32) -> Self {
        if is_mobile(width) {
            match self {
                Sidebar::MobileOpen => Sidebar::MobileClosed,
                _ => Sidebar::MobileOpen,
            }
        } else {
            match self {
                Sidebar::Collapsed => Sidebar::Expanded,
                Sidebar::Expanded => Sidebar::Collapsed,
                // Mobile states never carry the collapsed flag.
                Sidebar::MobileOpen | Sidebar::MobileClosed => Sidebar::Collapsed,
            }
        }
    }

    /// Widening past the breakpoint drops the mobile overlay.
    pub fn resize(self, width: u32) -> Self {
        match self {
            Sidebar::MobileOpen | Sidebar::MobileClosed if !is_mobile(width) => Sidebar::Expanded,
            other => other,
        }
    }

    pub fn backdrop_click(self) -> Self {
        match self {
            Sidebar::MobileOpen => Sidebar::MobileClosed,
            other => other,
        }
    }

    pub fn backdrop_active(self) -> bool {
        self == Sidebar::MobileOpen
    }

    pub fn toggle_label(self) -> &'static str {
        if self == Sidebar::MobileOpen {
            "✕"
        } else {
            "☰"
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "view")]
pub enum View {
    Project,
    Loading { step: u32 },
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigator {
    pub view: View,
    pub revealed: [bool; RESULT_SECTIONS],
}

impl Default for Navigator {
    fn default() -> Self {
        Self { view: View::Project, revealed: [false; RESULT_SECTIONS] }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loading sequence. Ignored unless on the project view.
    pub fn go_to_results(&mut self) {
        if self.view == View::Project {
            self.set_view(View::Loading { step: 0 });
            self.revealed = [false; RESULT_SECTIONS];
        }
    }

    fn set_view(&mut self, view: View) {
        log_transition("view", &self.view, &view);
        self.view = view;
    }

    /// Advance one second of the loading sequence.
    pub fn tick(&mut self) {
        let View::Loading { step } = self.view else {
            return;
        };
        let step = step + 1;
        if step >= LOADING_SECS {
            self.set_view(View::Results);
            self.revealed = [true; RESULT_SECTIONS];
            return;
        }
        for (at, sections) in REVEAL_SCHEDULE {
            if at == step {
                for &s in sections {
                    self.revealed[s] = true;
                }
            }
        }
        self.set_view(View::Loading { step });
    }

    pub fn back_to_project(&mut self) {
        self.set_view(View::Project);
    }

    /// Message shown while loading; holds the last one once steps run out.
    pub fn loading_message(&self) -> Option<&'static str> {
        match self.view {
            View::Loading { step } => {
                let idx = (step as usize).min(LOADING_MESSAGES.len() - 1);
                Some(LOADING_MESSAGES[idx])
            }
            _ => None,
        }
    }

    pub fn back_button_visible(&self) -> bool {
        self.view == View::Results
    }
}
