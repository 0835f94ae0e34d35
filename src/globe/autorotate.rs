//! Continuous globe spin, cancellable through a handle

use super::scene::RotationCommand;
use std::cell::Cell;
use std::rc::Rc;

pub const DEFAULT_STEP: f64 = 0.2;
pub const DEFAULT_TILT: f64 = -15.0;

/// Produces one longitude advance per frame while a handle is alive.
pub struct AutoRotate {
    step: f64,
    tilt: f64,
    active: Rc<Cell<Option<u64>>>,
    next_id: u64,
}

/// Keeps the auto-rotation running. Dropping it, or calling `stop`, ends the loop.
#[must_use = "auto-rotation stops as soon as the handle is dropped"]
pub struct AutoRotateHandle {
    id: u64,
    active: Rc<Cell<Option<u64>>>,
}

impl AutoRotateHandle {
    pub fn stop(self) {}
}

impl Drop for AutoRotateHandle {
    fn drop(&mut self) {
        // A stale handle must not stop a loop restarted after it
        if self.active.get() == Some(self.id) {
            self.active.set(None);
        }
    }
}

impl Default for AutoRotate {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, DEFAULT_TILT)
    }
}

impl AutoRotate {
    pub fn new(step: f64, tilt: f64) -> Self {
        Self {
            step,
            tilt,
            active: Rc::new(Cell::new(None)),
            next_id: 0,
        }
    }

    pub fn start(&mut self) -> AutoRotateHandle {
        self.next_id += 1;
        self.active.set(Some(self.next_id));
        AutoRotateHandle {
            id: self.next_id,
            active: Rc::clone(&self.active),
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.get().is_some()
    }

    /// Command for this frame, if the loop is running.
    pub fn tick(&self) -> Option<RotationCommand> {
        self.is_running().then_some(RotationCommand::AutoTick {
            step: self.step,
            tilt: self.tilt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ticks_without_a_handle() {
        let auto = AutoRotate::default();
        assert!(!auto.is_running());
        assert!(auto.tick().is_none());
    }

    #[test]
    fn dropping_the_handle_stops_the_loop() {
        let mut auto = AutoRotate::default();
        let handle = auto.start();
        assert_eq!(
            auto.tick(),
            Some(RotationCommand::AutoTick { step: 0.2, tilt: -15.0 })
        );
        handle.stop();
        assert!(auto.tick().is_none());
    }

    #[test]
    fn stale_handle_does_not_stop_a_restarted_loop() {
        let mut auto = AutoRotate::default();
        let first = auto.start();
        let second = auto.start();
        drop(first);
        assert!(auto.is_running());
        drop(second);
        assert!(!auto.is_running());
    }
}
