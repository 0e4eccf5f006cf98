//! Headless game flow: one globe, one question set, a scripted player.
//!
//! Each round enables hover highlighting, waits for a click or the round
//! timer, scores the answer, highlights target and wrong guess, then rotates
//! to the target before clearing the board. The session ends by zooming out.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use clap::ValueEnum;
use formats::Dataset;
use foundation::ids::CountryId;
use foundation::math::{central_angle_to_km, shortest_delta_degrees, LonLat};
use globe::{Globe, GlobeEvent, Highlight, NullTarget, PointVisibility, RenderTarget, RotationDirection};
use quiz::{QuestionSet, QuizError, Score};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AppError;

/// Drag gestures are fed in steps no longer than this.
const DRAG_STEP_PX: f64 = 40.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Drag the target into view and click its centroid.
    #[default]
    Centroid,
    /// Click a random spot on the visible disc.
    Random,
    /// Never click; every round times out.
    Timeout,
}

pub struct Player {
    strategy: Strategy,
    rng: ChaCha8Rng,
}

impl Player {
    pub fn new(strategy: Strategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Interacts with the globe and returns where to click, if anywhere.
    pub fn act<T: RenderTarget>(&mut self, globe: &mut Globe<T>, target: LonLat) -> Option<[f64; 2]> {
        match self.strategy {
            Strategy::Timeout => None,
            Strategy::Random => {
                let pc = globe.projection();
                let [tx, ty] = pc.translate();
                let r = pc.scale() * self.rng.gen_range(0.0..1.0f64).sqrt();
                let theta = self.rng.gen_range(0.0..TAU);
                Some([tx + r * theta.cos(), ty + r * theta.sin()])
            }
            Strategy::Centroid => {
                drag_towards(globe, target);
                globe.projection().project(target)
            }
        }
    }
}

/// Drags so `target` ends up near the view center.
fn drag_towards<T: RenderTarget>(globe: &mut Globe<T>, target: LonLat) {
    let k = globe.config().rotation_scale_constant / globe.projection().scale();
    let [lambda, phi, _] = globe.projection().rotation();
    let dx = shortest_delta_degrees(lambda, -target.lon_deg) / k;
    let dy = (phi + target.lat_deg) / k;
    let length = dx.hypot(dy);
    // Anything this short would register as a click.
    if length <= 2.0 * globe.config().click_threshold_px {
        return;
    }

    let tick = globe.config().rotation_update_interval_ms + 5.0;
    let start = globe.projection().translate();
    let steps = (length / DRAG_STEP_PX).ceil() as usize;
    globe.pointer_down(start);
    for i in 1..=steps {
        globe.tick(tick);
        let t = i as f64 / steps as f64;
        globe.pointer_move([start[0] + dx * t, start[1] + dy * t]);
    }
    globe.pointer_up([start[0] + dx, start[1] + dy]);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub round: usize,
    pub country: i64,
    pub name: String,
    pub clicked: Option<i64>,
    pub clicked_name: Option<String>,
    pub point: Option<[f64; 2]>,
    pub distance_km: Option<f64>,
    pub correct: bool,
    pub adjacent: bool,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub rounds: Vec<RoundResult>,
    pub total: u32,
    pub max_total: u32,
    pub correct: usize,
    pub transitions: usize,
    pub draws: u64,
    pub average_draw_ms: f64,
}

type ClickSlot = Rc<RefCell<Option<(Option<LonLat>, Option<CountryId>)>>>;

pub struct Session {
    config: AppConfig,
    dataset: Rc<Dataset>,
    globe: Globe<NullTarget>,
    questions: QuestionSet,
    player: Player,
}

impl Session {
    pub fn new(config: AppConfig, dataset: Rc<Dataset>, questions: QuestionSet, player: Player) -> Self {
        let globe = Globe::new(config.globe.clone(), dataset.clone(), NullTarget);
        Self {
            config,
            dataset,
            globe,
            questions,
            player,
        }
    }

    pub fn play(mut self) -> Result<SessionSummary, AppError> {
        self.globe.draw();
        self.globe.start_auto_rotate(RotationDirection::Forward);
        self.globe.tick(self.config.session.results_delay_ms);

        let targets: Vec<(CountryId, LonLat, String)> = self
            .questions
            .iter()
            .map(|q| (q.target_id(), q.centroid(), q.name().to_string()))
            .collect();
        let mut rounds = Vec::with_capacity(targets.len());
        for (index, (target, centroid, name)) in targets.into_iter().enumerate() {
            rounds.push(self.play_round(index, target, centroid, name)?);
        }

        self.globe.disable_highlight_mode();
        self.globe.zoom_out(Some(Box::new(|g: &mut Globe<NullTarget>| {
            g.start_auto_rotate(RotationDirection::Forward);
        })))?;
        self.settle();
        self.globe.stop_auto_rotate();

        let transitions = self
            .globe
            .drain_events()
            .iter()
            .filter(|e| matches!(e.payload, GlobeEvent::TransitionFinished(_)))
            .count();
        let stats = self.globe.render_loop().stats();
        let summary = SessionSummary {
            total: self.questions.total_score(),
            max_total: self.config.scoring.max_score() * self.questions.len() as u32,
            correct: self.questions.correct_count(),
            rounds,
            transitions,
            draws: stats.draws,
            average_draw_ms: stats.average_ms,
        };
        info!(
            total = summary.total,
            max_total = summary.max_total,
            correct = summary.correct,
            "session finished"
        );
        Ok(summary)
    }

    fn play_round(
        &mut self,
        index: usize,
        target: CountryId,
        centroid: LonLat,
        name: String,
    ) -> Result<RoundResult, AppError> {
        debug!(round = index + 1, country = %target, %name, "round started");

        let slot: ClickSlot = Rc::default();
        let sink = slot.clone();
        self.globe.enable_highlight_mode();
        self.globe.on_click(move |point, country| {
            if point.is_some() {
                sink.borrow_mut().get_or_insert((point, country));
            }
        });

        let started = self.globe.now();
        if let Some(pos) = self.player.act(&mut self.globe, centroid) {
            self.globe.click_at(pos);
        }
        if slot.borrow().is_none() {
            let remaining = self.config.session.round_time_ms - self.globe.now().since(started);
            self.globe.tick(remaining.max(0.0));
        }

        self.globe.clear_click_handler();
        self.globe.disable_highlight_mode();
        let (point, clicked) = slot.borrow_mut().take().unwrap_or((None, None));

        let adjacency = self.dataset.adjacency();
        let scoring = &self.config.scoring;
        let question = self
            .questions
            .get_question_mut(index)
            .ok_or(QuizError::UnknownCountry(target))?;
        let score = question.answer(point, clicked, adjacency, scoring)?;
        let correct = question.is_correct();
        let adjacent = question.is_adjacent();
        let closest = question.closest_point();

        self.globe.highlight_country(target, Highlight::Correct)?;
        if let Some(id) = clicked.filter(|_| !correct) {
            if let Err(e) = self.globe.highlight_country(id, Highlight::Incorrect) {
                warn!(country = %id, error = %e, "cannot highlight answer");
            }
        }
        if let (Some(p), Some(c)) = (point, closest) {
            self.globe.add_point(p, PointVisibility::VisibleOnHorizon);
            self.globe.add_line(p, c.point);
        }
        self.globe.draw();
        self.globe.tick(self.config.session.results_delay_ms);

        self.globe.rotate_to_location(centroid, None)?;
        self.settle();
        self.globe.clear_overlays();
        self.globe.draw();

        let result = RoundResult {
            round: index + 1,
            country: target.0,
            name,
            clicked: clicked.map(|id| id.0),
            clicked_name: clicked.and_then(|id| self.dataset.country(id)).map(|c| c.name.clone()),
            point: point.map(LonLat::to_array),
            distance_km: closest.map(|c| central_angle_to_km(c.distance)),
            correct,
            adjacent,
            score,
        };
        debug!(round = result.round, total = score.total, correct, "round finished");
        Ok(result)
    }

    /// Runs host frames until the running transition, if any, completes.
    fn settle(&mut self) {
        let frame = self.config.session.frame_ms.max(1.0);
        while self.globe.is_transitioning() {
            self.globe.tick(frame);
        }
    }
}
