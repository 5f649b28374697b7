use crate::trigger::{detect_edge, Edge};
use std::fmt;

pub type ActivationListener = Box<dyn Fn(bool) + Send + Sync>;

/// Global enable switch for every binding except `pause`.
pub struct ActivationState {
    active: bool,
    listeners: Vec<ActivationListener>,
}

impl fmt::Debug for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationState")
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ActivationState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ActivationState {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            listeners: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the flag, notifying listeners when the value changes.
    pub fn set(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        tracing::info!(active, "activation changed");
        for listener in &self.listeners {
            listener(active);
        }
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.set(!self.active);
        self.active
    }

    pub fn subscribe(&mut self, listener: ActivationListener) {
        self.listeners.push(listener);
    }
}

/// Evaluate the `pause` binding: each rising edge toggles the gate.
///
/// Runs whether or not the gate is active. Returns `true` when the gate was
/// toggled on this tick.
pub fn evaluate_pause(
    slot_active: &mut bool,
    value: f32,
    threshold: f32,
    gate: &mut ActivationState,
) -> bool {
    if detect_edge(slot_active, value, threshold) == Some(Edge::Rising) {
        gate.toggle();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn pause_toggles_once_per_rising_edge() {
        let mut gate = ActivationState::new(true);
        let mut slot = false;
        let toggles: Vec<bool> = [0.1, 0.9, 0.95, 0.1, 0.9]
            .iter()
            .map(|&v| evaluate_pause(&mut slot, v, 0.5, &mut gate))
            .collect();
        assert_eq!(toggles, vec![false, true, false, false, true]);
        assert!(gate.is_active());
    }

    #[test]
    fn listeners_see_changes_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut gate = ActivationState::new(false);
        let sink = Arc::clone(&seen);
        gate.subscribe(Box::new(move |active| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(active);
            }
        }));

        gate.set(false);
        gate.set(true);
        gate.set(true);
        assert!(!gate.toggle());

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }
}
