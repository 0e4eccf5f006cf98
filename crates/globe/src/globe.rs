//! `Globe` wires projection, rendering, interaction and timers together.
//!
//! Everything runs on the caller's thread. Time advances only through
//! [`Globe::tick`]; animation frames, auto-rotation and the wheel settle redraw
//! are timers in the globe's scheduler.

use std::rc::Rc;

use formats::Dataset;
use foundation::geometry::GeometryError;
use foundation::ids::CountryId;
use foundation::math::LonLat;
use foundation::time::Time;
use runtime::{Event, EventBus, Frame, Scheduler, TimerId};
use tracing::{debug, info};

use crate::config::GlobeConfig;
use crate::interaction::{InteractionController, InteractionEffect};
use crate::overlays::{Highlight, Overlays, PointVisibility};
use crate::projection::{ProjectionController, ProjectionState};
use crate::render::{DrawReport, RenderLoop, RenderTarget};
use crate::transition::Transition;

pub type ClickHandler = Box<dyn FnMut(Option<LonLat>, Option<CountryId>)>;
pub type TransitionCallback<T> = Box<dyn FnOnce(&mut Globe<T>)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RotationDirection {
    /// Longitude increases; the globe turns eastwards under the viewer.
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    Drawn(DrawReport),
    TransitionStarted {
        target: ProjectionState,
        duration_ms: f64,
    },
    TransitionFinished(ProjectionState),
    AutoRotateStarted(RotationDirection),
    AutoRotateStopped,
    InteractionToggled(bool),
    Clicked {
        lonlat: Option<LonLat>,
        country: Option<CountryId>,
    },
}

#[derive(Debug)]
pub enum GlobeError {
    TransitionInProgress,
    UnknownCountry(CountryId),
    Geometry(GeometryError),
}

impl std::fmt::Display for GlobeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobeError::TransitionInProgress => write!(f, "a transition is already running"),
            GlobeError::UnknownCountry(id) => write!(f, "country {id} is not in the dataset"),
            GlobeError::Geometry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GlobeError {}

impl From<GeometryError> for GlobeError {
    fn from(e: GeometryError) -> Self {
        GlobeError::Geometry(e)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TimerTag {
    AnimationTick,
    AutoRotate,
    WheelSettle,
}

struct ActiveTransition<T> {
    transition: Transition,
    timer: TimerId,
    on_complete: Option<TransitionCallback<T>>,
}

pub struct Globe<T> {
    config: GlobeConfig,
    dataset: Rc<Dataset>,
    projection: ProjectionController,
    render: RenderLoop,
    interaction: Option<InteractionController>,
    scheduler: Scheduler<TimerTag>,
    events: EventBus<GlobeEvent>,
    frame: Frame,
    target: T,
    transition: Option<ActiveTransition<T>>,
    auto_rotate: Option<(TimerId, RotationDirection)>,
    wheel_settle: Option<TimerId>,
    click_handler: Option<ClickHandler>,
    point_mode: bool,
}

impl<T: RenderTarget> Globe<T> {
    /// Interactive globe.
    pub fn new(config: GlobeConfig, dataset: Rc<Dataset>, target: T) -> Self {
        let interaction = InteractionController::new(&config);
        let mut globe = Self::without_interaction(config, dataset, target);
        globe.interaction = Some(interaction);
        globe
    }

    /// Globe that only moves under programmatic control.
    pub fn without_interaction(config: GlobeConfig, dataset: Rc<Dataset>, target: T) -> Self {
        let projection = ProjectionController::new(&config);
        let render = RenderLoop::new(&config);
        info!(
            width = config.width,
            height = config.height,
            min_scale = projection.min_scale(),
            max_scale = projection.max_scale(),
            "globe created"
        );
        Self {
            config,
            dataset,
            projection,
            render,
            interaction: None,
            scheduler: Scheduler::new(),
            events: EventBus::new(),
            frame: Frame::first(),
            target,
            transition: None,
            auto_rotate: None,
            wheel_settle: None,
            click_handler: None,
            point_mode: false,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Rc<Dataset> {
        &self.dataset
    }

    pub fn projection(&self) -> &ProjectionController {
        &self.projection
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    pub fn overlays(&self) -> &Overlays {
        self.render.overlays()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn now(&self) -> Time {
        self.scheduler.now()
    }

    pub fn events(&self) -> &[Event<GlobeEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<GlobeEvent>> {
        self.events.drain()
    }

    pub fn draw(&mut self) -> DrawReport {
        let report = self
            .render
            .draw(&self.projection, &self.dataset, &mut self.target);
        self.events.emit(self.frame, GlobeEvent::Drawn(report));
        report
    }

    /// Advances engine time and runs whatever timers came due.
    pub fn tick(&mut self, dt_ms: f64) {
        self.frame = self.frame.next(dt_ms);
        for fired in self.scheduler.advance(dt_ms) {
            match fired.tag {
                TimerTag::AnimationTick => {
                    if self.transition.as_ref().is_some_and(|t| t.timer == fired.id) {
                        self.step_transition();
                    }
                }
                TimerTag::AutoRotate => {
                    if self.auto_rotate.is_some_and(|(id, _)| id == fired.id) {
                        self.step_auto_rotate();
                    }
                }
                TimerTag::WheelSettle => {
                    if self.wheel_settle == Some(fired.id) {
                        self.wheel_settle = None;
                        self.draw();
                    }
                }
            }
        }
    }

    // ---- transitions ----------------------------------------------------

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Tweens to the given rotation and/or scale over `duration_ms`.
    ///
    /// For the duration the low-detail data is drawn and user interaction is
    /// off. When it ends detail and interaction are restored, a final frame is
    /// drawn and `on_complete` runs.
    pub fn animate_transition(
        &mut self,
        target_rotation: Option<[f64; 3]>,
        target_scale: Option<f64>,
        duration_ms: f64,
        on_complete: Option<TransitionCallback<T>>,
    ) -> Result<(), GlobeError> {
        if self.transition.is_some() {
            return Err(GlobeError::TransitionInProgress);
        }
        self.stop_auto_rotate();
        if let Some(id) = self.wheel_settle.take() {
            self.scheduler.cancel(id);
        }

        let transition = Transition::new(
            self.projection.state(),
            target_rotation,
            target_scale,
            self.scheduler.now(),
            duration_ms,
        );
        let timer = self
            .scheduler
            .set_interval(self.config.animation_tick_ms, TimerTag::AnimationTick);
        self.transition = Some(ActiveTransition {
            transition,
            timer,
            on_complete,
        });

        debug!(?target_rotation, ?target_scale, duration_ms, "transition started");
        self.events.emit(
            self.frame,
            GlobeEvent::TransitionStarted {
                target: transition.target(),
                duration_ms,
            },
        );

        self.projection.set_low_detail(true);
        self.set_interaction_enabled(false);
        self.draw();

        if transition.is_finished(self.scheduler.now()) {
            self.finish_transition();
        }
        Ok(())
    }

    /// Rotates so `lonlat` ends up at the view center.
    pub fn rotate_to_location(
        &mut self,
        lonlat: LonLat,
        on_complete: Option<TransitionCallback<T>>,
    ) -> Result<(), GlobeError> {
        let rotation = [-lonlat.lon_deg, -lonlat.lat_deg, 0.0];
        let duration = self.config.rotation_transition_ms;
        self.animate_transition(Some(rotation), None, duration, on_complete)
    }

    /// Zooms back out to the fitted scale.
    pub fn zoom_out(&mut self, on_complete: Option<TransitionCallback<T>>) -> Result<(), GlobeError> {
        let scale = self.projection.min_scale();
        let duration = self.config.zoom_out_transition_ms;
        self.animate_transition(None, Some(scale), duration, on_complete)
    }

    fn step_transition(&mut self) {
        let Some(active) = self.transition.as_ref() else {
            return;
        };
        let now = self.scheduler.now();
        let state = active.transition.at(now);
        let finished = active.transition.is_finished(now);

        self.projection.set_rotation(state.rotation);
        self.projection.set_scale(state.scale);
        if finished {
            self.finish_transition();
        } else {
            self.draw();
        }
    }

    fn finish_transition(&mut self) {
        let Some(active) = self.transition.take() else {
            return;
        };
        self.scheduler.cancel(active.timer);

        let target = active.transition.target();
        self.projection.set_rotation(target.rotation);
        self.projection.set_scale(target.scale);
        self.projection.set_low_detail(false);
        self.set_interaction_enabled(true);
        self.draw();

        debug!(rotation = ?target.rotation, scale = target.scale, "transition finished");
        self.events
            .emit(self.frame, GlobeEvent::TransitionFinished(self.projection.state()));
        if let Some(callback) = active.on_complete {
            callback(self);
        }
    }

    // ---- auto-rotate ----------------------------------------------------

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate.is_some()
    }

    pub fn start_auto_rotate(&mut self, direction: RotationDirection) {
        if let Some((id, _)) = self.auto_rotate.take() {
            self.scheduler.cancel(id);
        }
        let id = self
            .scheduler
            .set_interval(self.config.auto_rotate_period_ms, TimerTag::AutoRotate);
        self.auto_rotate = Some((id, direction));
        self.events
            .emit(self.frame, GlobeEvent::AutoRotateStarted(direction));
    }

    /// No-op when not rotating.
    pub fn stop_auto_rotate(&mut self) {
        if let Some((id, _)) = self.auto_rotate.take() {
            self.scheduler.cancel(id);
            self.events.emit(self.frame, GlobeEvent::AutoRotateStopped);
        }
    }

    fn step_auto_rotate(&mut self) {
        let Some((_, direction)) = self.auto_rotate else {
            return;
        };
        let step = match direction {
            RotationDirection::Forward => self.config.auto_rotate_step_deg,
            RotationDirection::Reverse => -self.config.auto_rotate_step_deg,
        };
        let [lambda, phi, gamma] = self.projection.rotation();
        self.projection.set_rotation([lambda + step, phi, gamma]);
        self.draw();
    }

    // ---- interaction ----------------------------------------------------

    pub fn is_interactive(&self) -> bool {
        self.interaction.is_some()
    }

    pub fn is_interaction_enabled(&self) -> bool {
        self.interaction.as_ref().is_some_and(|i| i.is_enabled())
    }

    pub fn enable_interaction(&mut self) {
        self.set_interaction_enabled(true);
    }

    pub fn disable_interaction(&mut self) {
        self.set_interaction_enabled(false);
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        if interaction.is_enabled() != enabled {
            interaction.set_enabled(enabled);
            self.events
                .emit(self.frame, GlobeEvent::InteractionToggled(enabled));
        }
    }

    /// Replaces the click handler.
    pub fn on_click(&mut self, handler: impl FnMut(Option<LonLat>, Option<CountryId>) + 'static) {
        self.click_handler = Some(Box::new(handler));
    }

    pub fn clear_click_handler(&mut self) {
        self.click_handler = None;
    }

    pub fn has_click_handler(&self) -> bool {
        self.click_handler.is_some()
    }

    pub fn pointer_down(&mut self, pos: [f64; 2]) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let effect = interaction.pointer_down(pos);
        self.apply_effect(effect);
    }

    pub fn pointer_move(&mut self, pos: [f64; 2]) {
        let now = self.scheduler.now();
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let effect = interaction.pointer_move(pos, now, &mut self.projection);
        self.apply_effect(effect);
    }

    pub fn pointer_up(&mut self, pos: [f64; 2]) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let effect = interaction.pointer_up(pos, &mut self.projection);
        self.apply_effect(effect);
    }

    /// Positive `delta_y` zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let effect = interaction.wheel(delta_y, &mut self.projection);
        self.apply_effect(effect);
    }

    /// Convenience: press and release at the same spot.
    pub fn click_at(&mut self, pos: [f64; 2]) {
        self.pointer_down(pos);
        self.pointer_up(pos);
    }

    fn apply_effect(&mut self, effect: InteractionEffect) {
        match effect {
            InteractionEffect::Ignored | InteractionEffect::Throttled => {}
            InteractionEffect::GestureStarted => {
                self.stop_auto_rotate();
                self.projection.set_low_detail(true);
            }
            InteractionEffect::Rotated(_) => {
                self.draw();
            }
            InteractionEffect::GestureEnded(_) => {
                self.projection.set_low_detail(false);
                self.draw();
            }
            InteractionEffect::Click(pos) => {
                if !self.is_transitioning() {
                    self.projection.set_low_detail(false);
                }
                self.handle_click(pos);
                self.draw();
            }
            InteractionEffect::Zoomed(_) => {
                self.stop_auto_rotate();
                self.projection.set_low_detail(true);
                self.draw();
                self.projection.set_low_detail(false);

                if let Some(id) = self.wheel_settle.take() {
                    self.scheduler.cancel(id);
                }
                self.wheel_settle = Some(
                    self.scheduler
                        .set_timeout(self.config.wheel_settle_ms, TimerTag::WheelSettle),
                );
            }
        }
    }

    fn handle_click(&mut self, pos: [f64; 2]) {
        if self.point_mode {
            if let Some(existing) = self.render.point_at_screen(&self.projection, pos) {
                self.render.overlays_mut().remove_point(existing);
                return;
            }
        }

        let lonlat = self.projection.invert_screen_point(pos);
        if self.point_mode {
            if let Some(p) = lonlat {
                self.render
                    .overlays_mut()
                    .add_point(p, PointVisibility::default());
            }
        }

        let level = self.projection.detail_level();
        let country = lonlat
            .and_then(|p| self.dataset.detail(level).country_at(p))
            .map(|c| c.id);

        debug!(?lonlat, ?country, "click");
        self.events
            .emit(self.frame, GlobeEvent::Clicked { lonlat, country });
        if let Some(handler) = self.click_handler.as_mut() {
            handler(lonlat, country);
        }
    }

    // ---- overlays -------------------------------------------------------

    pub fn is_point_mode(&self) -> bool {
        self.point_mode
    }

    /// In point mode clicks drop markers, and clicking a marker removes it.
    pub fn set_point_mode(&mut self, enabled: bool) {
        self.point_mode = enabled;
    }

    pub fn enable_highlight_mode(&mut self) {
        self.render.set_highlight_mode(true);
    }

    pub fn disable_highlight_mode(&mut self) {
        self.render.set_highlight_mode(false);
    }

    pub fn highlight_country(&mut self, id: CountryId, highlight: Highlight) -> Result<(), GlobeError> {
        let country = self
            .dataset
            .country(id)
            .ok_or(GlobeError::UnknownCountry(id))?;
        let threshold = self.render.small_country_radius();
        self.render
            .overlays_mut()
            .highlight_country(country, highlight, threshold)?;
        Ok(())
    }

    pub fn clear_highlighted_countries(&mut self) {
        self.render.overlays_mut().clear_highlights();
    }

    pub fn add_point(&mut self, lonlat: LonLat, visibility: PointVisibility) {
        self.render.overlays_mut().add_point(lonlat, visibility);
    }

    pub fn remove_point(&mut self, lonlat: LonLat) -> bool {
        self.render.overlays_mut().remove_point(lonlat)
    }

    pub fn clear_points(&mut self) {
        self.render.overlays_mut().clear_points();
    }

    pub fn add_line(&mut self, from: LonLat, to: LonLat) {
        self.render.overlays_mut().add_line(from, to);
    }

    pub fn clear_lines(&mut self) {
        self.render.overlays_mut().clear_lines();
    }

    /// Drops every marker, guide line and highlight.
    pub fn clear_overlays(&mut self) {
        self.render.overlays_mut().clear();
    }

    pub fn clear_stats(&mut self) {
        self.render.clear_stats();
    }
}

#[cfg(test)]
mod tests {
    use super::{Globe, GlobeError, GlobeEvent, RotationDirection};
    use crate::config::GlobeConfig;
    use crate::overlays::{Highlight, PointVisibility};
    use crate::render::{LayerKind, RecordingTarget};
    use formats::{AdjacencyGraph, Country, Dataset, DetailLevel, DetailSet};
    use foundation::geometry::Geometry;
    use foundation::ids::CountryId;
    use foundation::math::{approx_eq, LonLat};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn square(id: i64, lon: f64, lat: f64, size: f64) -> Country {
        Country {
            id: CountryId(id),
            name: format!("C{id}"),
            geometry: Geometry::Polygon(vec![vec![
                LonLat::new(lon, lat),
                LonLat::new(lon + size, lat),
                LonLat::new(lon + size, lat + size),
                LonLat::new(lon, lat + size),
                LonLat::new(lon, lat),
            ]]),
        }
    }

    fn globe() -> Globe<RecordingTarget> {
        let set = DetailSet::new(
            vec![square(1, -10.0, -10.0, 20.0), square(2, 40.0, 10.0, 10.0)],
            vec![],
            vec![],
        );
        let ds = Dataset::from_detail_set(set, AdjacencyGraph::new()).expect("dataset");
        Globe::new(GlobeConfig::default(), Rc::new(ds), RecordingTarget::new())
    }

    fn assert_close(a: f64, b: f64) {
        assert!(approx_eq(a, b, 1e-9), "expected {a} ~= {b}");
    }

    #[test]
    fn rotate_to_location_runs_to_completion() {
        let mut g = globe();
        let done = Rc::new(RefCell::new(false));
        let flag = done.clone();
        g.rotate_to_location(
            LonLat::new(45.0, 15.0),
            Some(Box::new(move |_: &mut Globe<RecordingTarget>| {
                *flag.borrow_mut() = true;
            })),
        )
        .expect("start");

        assert!(g.is_transitioning());
        assert!(!g.is_interaction_enabled());
        assert!(g.projection().low_detail());
        assert!(matches!(
            g.rotate_to_location(LonLat::new(0.0, 0.0), None),
            Err(GlobeError::TransitionInProgress)
        ));

        g.tick(350.0);
        // One tick fired (intervals never replay missed periods): halfway.
        assert_close(g.projection().rotation()[0], -22.5);
        assert_eq!(g.target().last().map(|f| f.detail), Some(DetailLevel::Low));

        g.tick(400.0);
        assert!(!g.is_transitioning());
        assert!(*done.borrow());
        assert!(g.is_interaction_enabled());
        assert!(!g.projection().low_detail());
        assert_close(g.projection().rotation()[0], -45.0);
        assert_close(g.projection().rotation()[1], -15.0);
        let center = g.projection().center();
        assert_close(center.lon_deg, 45.0);
        assert_close(center.lat_deg, 15.0);

        let events = g.drain_events();
        assert!(events.iter().any(|e| matches!(e.payload, GlobeEvent::TransitionFinished(_))));
    }

    #[test]
    fn completion_callback_can_chain_a_transition() {
        let mut g = globe();
        g.wheel(-800.0);
        assert!(g.projection().scale() > g.projection().min_scale());

        g.rotate_to_location(
            LonLat::new(10.0, 0.0),
            Some(Box::new(|g: &mut Globe<RecordingTarget>| {
                g.zoom_out(None).expect("zoom out");
            })),
        )
        .expect("rotate");
        g.tick(800.0);
        assert!(g.is_transitioning());
        g.tick(1100.0);
        assert!(!g.is_transitioning());
        assert_close(g.projection().scale(), g.projection().min_scale());
    }

    #[test]
    fn auto_rotate_steps_and_stops_on_gesture() {
        let mut g = globe();
        g.start_auto_rotate(RotationDirection::Forward);
        for _ in 0..4 {
            g.tick(30.0);
        }
        assert_close(g.projection().rotation()[0], 2.0);

        g.pointer_down([10.0, 10.0]);
        assert!(!g.is_auto_rotating());
        g.tick(300.0);
        assert_close(g.projection().rotation()[0], 2.0);
        g.pointer_up([400.0, 10.0]);

        g.stop_auto_rotate();
        g.start_auto_rotate(RotationDirection::Reverse);
        let before = g.projection().rotation()[0];
        g.tick(30.0);
        assert_close(g.projection().rotation()[0], before - 0.5);
    }

    #[test]
    fn click_resolves_country_and_calls_handler() {
        let mut g = globe();
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = clicks.clone();
        g.on_click(move |lonlat, country| sink.borrow_mut().push((lonlat, country)));

        let center = g.projection().translate();
        g.click_at(center);
        let far = g.projection().project(LonLat::new(45.0, 15.0)).expect("visible");
        g.click_at(far);
        let ocean = g.projection().project(LonLat::new(-60.0, 0.0)).expect("visible");
        g.click_at(ocean);

        let got = clicks.borrow();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].1, Some(CountryId(1)));
        assert_eq!(got[1].1, Some(CountryId(2)));
        assert_eq!(got[2].1, None);
        assert!(got[2].0.is_some());
        drop(got);

        g.clear_click_handler();
        g.click_at(center);
        assert_eq!(clicks.borrow().len(), 3);
    }

    #[test]
    fn point_mode_toggles_markers() {
        let mut g = globe();
        g.set_point_mode(true);
        let pos = g.projection().project(LonLat::new(5.0, 5.0)).expect("visible");
        g.click_at(pos);
        assert_eq!(g.overlays().points().len(), 1);
        g.click_at(pos);
        assert!(g.overlays().points().is_empty());
    }

    #[test]
    fn wheel_draws_low_then_settles_high() {
        let mut g = globe();
        g.wheel(-2000.0);
        assert!(g.projection().scale() >= 1000.0);
        assert_eq!(g.target().last().map(|f| f.detail), Some(DetailLevel::Low));
        let drawn = g.target().presented();

        g.tick(50.0);
        assert_eq!(g.target().presented(), drawn);
        g.tick(60.0);
        assert_eq!(g.target().presented(), drawn + 1);
        assert_eq!(g.target().last().map(|f| f.detail), Some(DetailLevel::High));
    }

    #[test]
    fn highlight_unknown_country_is_an_error() {
        let mut g = globe();
        assert!(matches!(
            g.highlight_country(CountryId(99), Highlight::Correct),
            Err(GlobeError::UnknownCountry(CountryId(99)))
        ));
        g.highlight_country(CountryId(2), Highlight::Incorrect).expect("highlight");
        g.add_point(LonLat::new(0.0, 0.0), PointVisibility::AlwaysVisible);
        g.add_line(LonLat::new(0.0, 0.0), LonLat::new(45.0, 15.0));
        g.draw();
        let frame = g.target().last().expect("frame");
        assert_eq!(frame.layer(LayerKind::Markers).map(|l| l.primitives.len()), Some(1));
        assert_eq!(frame.layer(LayerKind::GuideLines).map(|l| l.primitives.len()), Some(1));

        g.clear_overlays();
        assert_eq!(g.overlays().highlight(CountryId(2)), None);
    }

    #[test]
    fn press_during_transition_cannot_drag_under_auto_rotate() {
        let mut g = globe();
        g.wheel(-800.0);
        g.zoom_out(Some(Box::new(|g: &mut Globe<RecordingTarget>| {
            g.start_auto_rotate(RotationDirection::Forward);
        })))
        .expect("zoom out");
        g.pointer_down([640.0, 400.0]);
        g.tick(1100.0);
        assert!(!g.is_transitioning());
        assert!(g.is_interaction_enabled());
        assert!(g.is_auto_rotating());

        let before = g.projection().rotation();
        g.pointer_move([840.0, 400.0]);
        assert_eq!(g.projection().rotation(), before);
        g.pointer_up([840.0, 400.0]);
        assert_eq!(g.projection().rotation(), before);

        // A fresh press is a real gesture and takes over from auto-rotate.
        g.pointer_down([640.0, 400.0]);
        assert!(!g.is_auto_rotating());
    }

    #[test]
    fn disabled_interaction_ignores_drag() {
        let mut g = globe();
        g.disable_interaction();
        g.pointer_down([100.0, 100.0]);
        g.tick(50.0);
        g.pointer_move([300.0, 300.0]);
        g.pointer_up([300.0, 300.0]);
        assert_eq!(g.projection().rotation(), [0.0, 0.0, 0.0]);
    }
}
