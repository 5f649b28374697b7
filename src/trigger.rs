//! Per-binding trigger evaluation.
//!
//! Every mode compares the raw gesture value against the binding threshold.
//! A rising edge is `value > threshold` while the binding is inactive and a
//! falling edge is `value < threshold` while it is active; a value exactly on
//! the threshold is neither. The same threshold serves both directions, so a
//! signal hovering at the threshold may chatter.

use crate::bindings::{BindingId, BindingSet};
use crate::input::{InputAction, MouseButton};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// One click per rising edge.
    Single,
    /// Button held while the gesture stays above the threshold.
    Hold,
    /// Click on the rising edge, escalating to a held button once the
    /// gesture has been sustained for the hold trigger delay.
    Dynamic,
    /// Press on one rising edge, release on the next one.
    Toggle,
    /// Reserved; evaluates to nothing.
    Rapid,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Single => "single",
            Trigger::Hold => "hold",
            Trigger::Dynamic => "dynamic",
            Trigger::Toggle => "toggle",
            Trigger::Rapid => "rapid",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTrigger(pub String);

impl FromStr for Trigger {
    type Err = UnknownTrigger;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Trigger::Single),
            "hold" => Ok(Trigger::Hold),
            "dynamic" => Ok(Trigger::Dynamic),
            "toggle" => Ok(Trigger::Toggle),
            "rapid" => Ok(Trigger::Rapid),
            _ => Err(UnknownTrigger(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Flags tracked for one binding slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    pub active: bool,
    /// Armed by a falling edge in TOGGLE mode; the next rising value releases.
    pub pending_release: bool,
}

/// Edge bookkeeping shared by every binding of the engine.
///
/// `hold_route` and `escalated` are separate flags: the first selects HOLD for
/// mouse bindings evaluated under the mode override, the second is the
/// DYNAMIC hold latch. Escalation never touches the route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    slots: HashMap<BindingId, SlotState>,
    hold_route: bool,
    escalated: bool,
    hold_started: Option<Instant>,
}

impl KeyState {
    /// Fresh state with one cleared slot per binding.
    pub fn for_bindings(bindings: &BindingSet) -> Self {
        let slots = bindings
            .iter()
            .map(|binding| (binding.id(), SlotState::default()))
            .collect();
        Self {
            slots,
            hold_route: false,
            escalated: false,
            hold_started: None,
        }
    }

    pub fn slot(&self, id: &BindingId) -> SlotState {
        self.slots.get(id).copied().unwrap_or_default()
    }

    pub fn slot_mut(&mut self, id: &BindingId) -> &mut SlotState {
        self.slots.entry(id.clone()).or_default()
    }

    /// Whether a DYNAMIC click has escalated into a held button.
    pub fn is_holding(&self) -> bool {
        self.escalated
    }

    /// Whether overridden mouse bindings run as HOLD instead of DYNAMIC.
    pub fn routes_through_hold(&self) -> bool {
        self.hold_route
    }

    /// Route overridden mouse bindings through HOLD until the next reload.
    pub fn set_route_through_hold(&mut self, hold: bool) {
        self.hold_route = hold;
    }

    pub fn hold_started(&self) -> Option<Instant> {
        self.hold_started
    }

    /// True when no slot is active, no release is pending and nothing is held.
    pub fn is_clear(&self) -> bool {
        !self.escalated
            && !self.hold_route
            && self.hold_started.is_none()
            && self
                .slots
                .values()
                .all(|slot| !slot.active && !slot.pending_release)
    }
}

/// Update `active` for an edge-triggered binding and report which edge, if
/// any, occurred.
pub fn detect_edge(active: &mut bool, value: f32, threshold: f32) -> Option<Edge> {
    if value > threshold && !*active {
        *active = true;
        Some(Edge::Rising)
    } else if value < threshold && *active {
        *active = false;
        Some(Edge::Falling)
    } else {
        None
    }
}

/// Inputs for one mouse binding evaluation.
#[derive(Debug, Clone, Copy)]
pub struct MouseTrigger<'a> {
    pub id: &'a BindingId,
    pub button: MouseButton,
    pub value: f32,
    pub threshold: f32,
    pub mode: Trigger,
}

/// Evaluate a mouse binding, pushing any resulting actions onto `out`.
///
/// `now` and `hold_trigger` only matter for DYNAMIC mode: the escalation
/// timer runs on wall-clock time since the last rising edge.
pub fn evaluate_mouse(
    state: &mut KeyState,
    trigger: MouseTrigger<'_>,
    now: Instant,
    hold_trigger: Duration,
    out: &mut Vec<InputAction>,
) {
    let MouseTrigger {
        id,
        button,
        value,
        threshold,
        mode,
    } = trigger;

    match mode {
        Trigger::Single => {
            let slot = state.slot_mut(id);
            if detect_edge(&mut slot.active, value, threshold) == Some(Edge::Rising) {
                out.push(InputAction::Click(button));
            }
        }
        Trigger::Hold => {
            let slot = state.slot_mut(id);
            match detect_edge(&mut slot.active, value, threshold) {
                Some(Edge::Rising) => out.push(InputAction::MouseDown(button)),
                Some(Edge::Falling) => out.push(InputAction::MouseUp(button)),
                None => {}
            }
        }
        Trigger::Dynamic => {
            if value > threshold {
                let slot = state.slot_mut(id);
                if !slot.active {
                    slot.active = true;
                    out.push(InputAction::Click(button));
                    state.hold_started = Some(now);
                }

                let elapsed = state
                    .hold_started
                    .map(|start| now.saturating_duration_since(start));
                if !state.escalated && elapsed.is_some_and(|elapsed| elapsed >= hold_trigger) {
                    out.push(InputAction::MouseDown(button));
                    state.escalated = true;
                }
            } else if value < threshold {
                let slot = state.slot_mut(id);
                if slot.active {
                    slot.active = false;
                    if state.escalated {
                        out.push(InputAction::MouseUp(button));
                        state.escalated = false;
                        state.hold_started = None;
                    }
                }
            }
        }
        Trigger::Toggle => {
            let slot = state.slot_mut(id);
            if value > threshold {
                if !slot.active {
                    slot.active = true;
                    out.push(InputAction::MouseDown(button));
                } else if slot.pending_release {
                    slot.pending_release = false;
                    slot.active = false;
                    out.push(InputAction::MouseUp(button));
                }
            } else if value < threshold && slot.active {
                slot.pending_release = true;
            }
        }
        Trigger::Rapid => {}
    }
}

/// Evaluate a keyboard binding. Keys always behave like a held button,
/// whatever mode the binding was configured with.
pub fn evaluate_keyboard(
    state: &mut KeyState,
    id: &BindingId,
    key: &str,
    value: f32,
    threshold: f32,
    out: &mut Vec<InputAction>,
) {
    let slot = state.slot_mut(id);
    match detect_edge(&mut slot.active, value, threshold) {
        Some(Edge::Rising) => out.push(InputAction::KeyDown(key.to_string())),
        Some(Edge::Falling) => out.push(InputAction::KeyUp(key.to_string())),
        None => {}
    }
}
