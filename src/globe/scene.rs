//! Owner of the globe rotation.
//!
//! Drag input and the auto-rotate loop never write the projection directly.
//! They push [`RotationCommand`]s, and [`GlobeScene::apply_frame`] drains
//! them once per frame in arrival order. Auto-rotate ticks that arrive while
//! the pointer is held are dropped, so a drag is never mixed with a spin.

use super::drag::{DragController, DragDelta};
use super::projection::{Orthographic, RotationState};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationCommand {
    /// Advance the baseline longitude and hold the latitude at `tilt`.
    AutoTick { step: f64, tilt: f64 },
    /// Rotation from the latest pointer move.
    Drag(DragDelta),
    /// Pointer released: the displayed longitude becomes the baseline.
    Release,
    /// Shift the baseline directly (keyboard).
    Nudge(f64),
}

pub struct GlobeScene {
    projection: Orthographic,
    drag: DragController,
    baseline: f64,
    queue: VecDeque<RotationCommand>,
}

impl GlobeScene {
    pub fn new(projection: Orthographic, drag: DragController, initial: RotationState) -> Self {
        let mut projection = projection;
        projection.set_rotation(initial);
        Self {
            projection,
            drag,
            baseline: initial.longitude,
            queue: VecDeque::new(),
        }
    }

    pub fn projection(&self) -> &Orthographic {
        &self.projection
    }

    pub fn rotation(&self) -> RotationState {
        self.projection.rotation()
    }

    /// Longitude that the next drag or auto-rotate tick builds on.
    #[cfg(test)]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(delta) = self.drag.pointer_move(x, y) {
            self.queue.push_back(RotationCommand::Drag(delta));
        }
    }

    pub fn pointer_up(&mut self) {
        if self.drag.pointer_up() {
            self.queue.push_back(RotationCommand::Release);
        }
    }

    pub fn enqueue(&mut self, command: RotationCommand) {
        self.queue.push_back(command);
    }

    /// Apply every queued command. Returns true if the rotation changed.
    pub fn apply_frame(&mut self) -> bool {
        let before = self.projection.rotation();
        while let Some(command) = self.queue.pop_front() {
            match command {
                RotationCommand::AutoTick { step, tilt } => {
                    if self.drag.is_dragging() {
                        continue;
                    }
                    self.baseline += step;
                    self.projection.set_rotation(RotationState::new(self.baseline, tilt));
                }
                RotationCommand::Drag(delta) => {
                    self.projection.set_rotation(RotationState::new(
                        self.baseline + delta.longitude_offset,
                        delta.latitude,
                    ));
                }
                RotationCommand::Release => {
                    self.baseline = self.projection.rotation().longitude;
                }
                RotationCommand::Nudge(degrees) => {
                    self.baseline += degrees;
                    let latitude = self.projection.rotation().latitude;
                    self.projection.set_rotation(RotationState::new(self.baseline, latitude));
                }
            }
        }
        self.projection.rotation() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::autorotate::AutoRotate;

    fn scene() -> GlobeScene {
        GlobeScene::new(
            Orthographic::new(250.0, (400.0, 400.0), 90.0),
            DragController::new(75.0),
            RotationState::new(0.0, -15.0),
        )
    }

    #[test]
    fn ten_auto_ticks_advance_two_degrees() {
        let mut scene = scene();
        let mut auto = AutoRotate::default();
        let _handle = auto.start();

        let mut last = scene.rotation().longitude;
        for _ in 0..10 {
            let tick = auto.tick().unwrap();
            scene.enqueue(tick);
            scene.apply_frame();
            let lon = scene.rotation().longitude;
            assert!(lon > last);
            last = lon;
            assert_eq!(scene.rotation().latitude, -15.0);
        }
        assert!((scene.rotation().longitude - 2.0).abs() < 1e-9);
    }

    #[test]
    fn drag_rotation_is_baseline_plus_latest_delta() {
        let mut scene = scene();
        scene.enqueue(RotationCommand::Nudge(10.0));
        scene.apply_frame();

        scene.pointer_down(0.0, 0.0);
        scene.pointer_move(150.0, 75.0);
        scene.pointer_move(225.0, 0.0);
        scene.apply_frame();

        let rotation = scene.rotation();
        assert!((rotation.longitude - (10.0 + 1.0)).abs() < 1e-12);
        assert!((rotation.latitude - 1.0).abs() < 1e-12);
    }

    #[test]
    fn release_fixes_the_baseline_for_later_drags() {
        let mut scene = scene();
        scene.pointer_down(0.0, 0.0);
        scene.pointer_move(150.0, 0.0);
        scene.pointer_up();
        scene.apply_frame();
        assert!((scene.baseline() - 2.0).abs() < 1e-12);

        scene.pointer_down(500.0, 500.0);
        scene.pointer_move(575.0, 500.0);
        scene.apply_frame();
        assert!((scene.rotation().longitude - 3.0).abs() < 1e-12);
    }

    #[test]
    fn auto_ticks_are_dropped_while_dragging() {
        let mut scene = scene();
        let mut auto = AutoRotate::default();
        let _handle = auto.start();

        scene.pointer_down(0.0, 0.0);
        scene.pointer_move(75.0, 0.0);
        scene.enqueue(auto.tick().unwrap());
        scene.apply_frame();
        assert!((scene.rotation().longitude - 1.0).abs() < 1e-12);
        assert_eq!(scene.baseline(), 0.0);

        scene.pointer_up();
        scene.enqueue(auto.tick().unwrap());
        scene.apply_frame();
        // Release first makes 1.0 the baseline, then the tick spins from there
        assert!((scene.rotation().longitude - 1.2).abs() < 1e-12);
        assert_eq!(scene.rotation().latitude, -15.0);
    }

    #[test]
    fn stray_pointer_up_queues_nothing() {
        let mut scene = scene();
        scene.pointer_up();
        scene.pointer_move(40.0, 40.0);
        assert!(!scene.apply_frame());
    }
}
