//! Pointer and wheel handling for the globe.
//!
//! Press/move/release sequences become throttled rotation updates; a press and
//! release without meaningful movement becomes a click. Wheel events zoom.

use foundation::time::Time;

use crate::config::GlobeConfig;
use crate::projection::{ProjectionController, ProjectionState};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InteractionEffect {
    /// Nothing changed: no gesture in progress, or interaction is disabled.
    Ignored,
    /// A drag may be starting; any auto-rotation should stop.
    GestureStarted,
    /// Move arrived inside the throttle window; its delta is carried forward.
    Throttled,
    Rotated(ProjectionState),
    Zoomed(ProjectionState),
    /// Drag finished after moving the globe.
    GestureEnded(ProjectionState),
    /// Press and release within the click threshold, at this screen position.
    Click([f64; 2]),
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Press {
    origin: [f64; 2],
    /// Position the last applied rotation was measured from.
    anchor: [f64; 2],
    latest: [f64; 2],
    last_update: Option<Time>,
    moved: bool,
    /// Pressed while enabled; only such presses may rotate the globe.
    draggable: bool,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    enabled: bool,
    rotation_update_interval_ms: f64,
    click_threshold_px: f64,
    press: Option<Press>,
}

impl InteractionController {
    pub fn new(cfg: &GlobeConfig) -> Self {
        Self {
            enabled: true,
            rotation_update_interval_ms: cfg.rotation_update_interval_ms.max(0.0),
            click_threshold_px: cfg.click_threshold_px.max(0.0),
            press: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling demotes a press in progress to click-only, so it cannot
    /// resume dragging once interaction comes back.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            if let Some(press) = self.press.as_mut() {
                press.draggable = false;
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.moved)
    }

    pub fn pointer_down(&mut self, pos: [f64; 2]) -> InteractionEffect {
        self.press = Some(Press {
            origin: pos,
            anchor: pos,
            latest: pos,
            last_update: None,
            moved: false,
            draggable: self.enabled,
        });
        if self.enabled {
            InteractionEffect::GestureStarted
        } else {
            InteractionEffect::Ignored
        }
    }

    pub fn pointer_move(
        &mut self,
        pos: [f64; 2],
        now: Time,
        projection: &mut ProjectionController,
    ) -> InteractionEffect {
        let threshold = self.click_threshold_px;
        let Some(press) = self.press.as_mut() else {
            return InteractionEffect::Ignored;
        };
        press.latest = pos;
        if distance(press.origin, pos) > threshold {
            press.moved = true;
        }
        if !self.enabled || !press.draggable || !press.moved {
            return InteractionEffect::Ignored;
        }

        if let Some(last) = press.last_update {
            if now.since(last) < self.rotation_update_interval_ms {
                return InteractionEffect::Throttled;
            }
        }
        let state = projection.apply_drag(pos[0] - press.anchor[0], pos[1] - press.anchor[1]);
        press.anchor = pos;
        press.last_update = Some(now);
        InteractionEffect::Rotated(state)
    }

    pub fn pointer_up(
        &mut self,
        pos: [f64; 2],
        projection: &mut ProjectionController,
    ) -> InteractionEffect {
        let Some(mut press) = self.press.take() else {
            return InteractionEffect::Ignored;
        };
        press.latest = pos;
        if distance(press.origin, pos) > self.click_threshold_px {
            press.moved = true;
        }
        if !press.moved {
            return InteractionEffect::Click(pos);
        }
        if !self.enabled || !press.draggable {
            return InteractionEffect::Ignored;
        }

        // Apply whatever the throttle held back.
        let (dx, dy) = (press.latest[0] - press.anchor[0], press.latest[1] - press.anchor[1]);
        let state = if dx != 0.0 || dy != 0.0 {
            projection.apply_drag(dx, dy)
        } else {
            projection.state()
        };
        InteractionEffect::GestureEnded(state)
    }

    /// Positive `delta_y` (wheel down) zooms out.
    pub fn wheel(&mut self, delta_y: f64, projection: &mut ProjectionController) -> InteractionEffect {
        if !self.enabled {
            return InteractionEffect::Ignored;
        }
        InteractionEffect::Zoomed(projection.apply_zoom(delta_y))
    }
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}
