//! Mutual exclusion with the host's cell-selection input mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Capability handle for the input mode that competes with a resize drag.
///
/// While a drag is active the host's cell-selection tool must not interpret
/// the same pointer movement as a selection, so the controller disables it
/// for the duration of the session. The capability is handed to
/// [`ResizeController::new`](crate::ResizeController::new) explicitly rather
/// than reached through a plugin registry.
pub trait SelectionGate {
    fn disable(&mut self);

    fn enable(&mut self);

    fn is_enabled(&self) -> bool;
}

/// Cloneable on/off flag implementing [`SelectionGate`].
///
/// One clone goes to the controller, another stays with the input code that
/// needs to check the flag. Starts enabled.
#[derive(Clone, Debug)]
pub struct SharedGate(Arc<AtomicBool>);

impl SharedGate {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Default for SharedGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionGate for SharedGate {
    fn disable(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }

    fn enable(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
