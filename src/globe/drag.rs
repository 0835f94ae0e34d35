//! Pointer drag to rotation deltas

/// Pointer-to-degrees divisor used when nothing else is configured.
pub const DEFAULT_SENSITIVITY: f64 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging { previous: (f64, f64) },
}

/// Rotation produced by one pointer move.
///
/// `longitude_offset` is added to the owner's longitude baseline; `latitude`
/// replaces the latitude outright.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragDelta {
    pub longitude_offset: f64,
    pub latitude: f64,
}

#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    sensitivity: f64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl DragController {
    pub fn new(sensitivity: f64) -> Self {
        let sensitivity = if sensitivity.is_finite() && sensitivity > 0.0 {
            sensitivity
        } else {
            DEFAULT_SENSITIVITY
        };
        Self { state: DragState::Idle, sensitivity }
    }

    #[cfg(test)]
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.state = DragState::Dragging { previous: (x, y) };
    }

    /// Delta relative to the previous move event, not to the drag start.
    /// Moves while idle are ignored.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<DragDelta> {
        let DragState::Dragging { previous } = self.state else {
            return None;
        };
        let dx = x - previous.0;
        let dy = y - previous.1;
        self.state = DragState::Dragging { previous: (x, y) };
        Some(DragDelta {
            longitude_offset: dx / self.sensitivity,
            latitude: -dy / self.sensitivity,
        })
    }

    /// Ends the drag. Returns whether a drag was actually in progress, in
    /// which case the owner must fix its longitude baseline.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}
