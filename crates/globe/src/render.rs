//! Headless render loop: builds screen-space layers from the projection state
//! and hands them to a [`RenderTarget`].

use std::time::Instant;

use formats::{Dataset, DetailLevel};
use foundation::geometry::{Geometry, circle_ring};
use foundation::ids::CountryId;
use foundation::math::{LonLat, great_circle_distance, horizon_point, interpolate};
use runtime::{DrawStats, DrawStatsSnapshot};
use tracing::{debug, warn};

use crate::config::GlobeConfig;
use crate::graticule::graticule_lines;
use crate::overlays::{Highlight, OverlayPoint, Overlays, PointVisibility};
use crate::projection::{ProjectionController, ProjectionState};
use crate::symbology::{LayerStyle, Rgba, Symbology};

/// Layers in draw order, back to front.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Graticule,
    Countries,
    Lakes,
    Rivers,
    GuideLines,
    Markers,
    HighlightRings,
}

impl LayerKind {
    pub const Z_ORDER: [LayerKind; 7] = [
        LayerKind::Graticule,
        LayerKind::Countries,
        LayerKind::Lakes,
        LayerKind::Rivers,
        LayerKind::GuideLines,
        LayerKind::Markers,
        LayerKind::HighlightRings,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum StyleClass {
    #[default]
    Default,
    Correct,
    Incorrect,
}

impl From<Highlight> for StyleClass {
    fn from(h: Highlight) -> Self {
        match h {
            Highlight::Correct => StyleClass::Correct,
            Highlight::Incorrect => StyleClass::Incorrect,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path {
        points: Vec<[f64; 2]>,
        closed: bool,
        class: StyleClass,
        country: Option<CountryId>,
    },
    Marker {
        center: [f64; 2],
        radius: f64,
        class: StyleClass,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub kind: LayerKind,
    pub style: LayerStyle,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub projection: ProjectionState,
    pub detail: DetailLevel,
    /// Countries react to hover while the globe waits for an answer.
    pub highlight_mode: bool,
    pub background: Rgba,
    pub correct: Rgba,
    pub incorrect: Rgba,
    pub layers: Vec<RenderLayer>,
}

impl RenderFrame {
    pub fn layer(&self, kind: LayerKind) -> Option<&RenderLayer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    pub fn primitive_count(&self) -> usize {
        self.layers.iter().map(|l| l.primitives.len()).sum()
    }
}

/// Consumer of finished frames (a canvas, an SVG writer, a test recorder).
pub trait RenderTarget {
    fn present(&mut self, frame: &RenderFrame);
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl RenderTarget for NullTarget {
    fn present(&mut self, _frame: &RenderFrame) {}
}

/// Keeps the most recent frame and a count of presented frames.
#[derive(Debug, Default, Clone)]
pub struct RecordingTarget {
    presented: u64,
    last: Option<RenderFrame>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn last(&self) -> Option<&RenderFrame> {
        self.last.as_ref()
    }
}

impl RenderTarget for RecordingTarget {
    fn present(&mut self, frame: &RenderFrame) {
        self.presented += 1;
        self.last = Some(frame.clone());
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawReport {
    pub detail: DetailLevel,
    pub primitives: usize,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone)]
pub struct RenderLoop {
    overlays: Overlays,
    symbology: Symbology,
    graticule: Vec<Vec<LonLat>>,
    guide_line_step_deg: f64,
    circle_step_deg: f64,
    marker_radius_px: f64,
    small_country_radius: f64,
    highlight_mode: bool,
    stats: DrawStats,
}

impl RenderLoop {
    pub fn new(cfg: &GlobeConfig) -> Self {
        Self {
            overlays: Overlays::new(),
            symbology: cfg.symbology.clone(),
            graticule: graticule_lines(cfg.graticule_step_deg),
            guide_line_step_deg: cfg.guide_line_step_deg.max(0.1),
            circle_step_deg: cfg.circle_step_deg,
            marker_radius_px: cfg.marker_radius_px,
            small_country_radius: cfg.small_country_radius_deg.to_radians(),
            highlight_mode: false,
            stats: DrawStats::new(),
        }
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut Overlays {
        &mut self.overlays
    }

    /// Ring threshold for [`Overlays::highlight_country`], in radians.
    pub fn small_country_radius(&self) -> f64 {
        self.small_country_radius
    }

    pub fn highlight_mode(&self) -> bool {
        self.highlight_mode
    }

    pub fn set_highlight_mode(&mut self, enabled: bool) {
        self.highlight_mode = enabled;
    }

    pub fn stats(&self) -> DrawStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn fps(&self, window_ms: f64) -> Option<f64> {
        self.stats.fps(window_ms)
    }

    pub fn clear_stats(&mut self) {
        self.stats.clear();
    }

    /// Full refresh of every layer. Safe to call any number of times.
    pub fn draw<T: RenderTarget + ?Sized>(
        &mut self,
        projection: &ProjectionController,
        dataset: &Dataset,
        target: &mut T,
    ) -> DrawReport {
        let started = Instant::now();
        let frame = self.build_frame(projection, dataset);
        target.present(&frame);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.stats.record(elapsed_ms);

        let report = DrawReport {
            detail: frame.detail,
            primitives: frame.primitive_count(),
            elapsed_ms,
        };
        debug!(
            detail = ?report.detail,
            primitives = report.primitives,
            elapsed_ms,
            average_ms = self.stats.average_ms(),
            "draw"
        );
        report
    }

    pub fn build_frame(&self, projection: &ProjectionController, dataset: &Dataset) -> RenderFrame {
        let detail = projection.detail_level();
        let data = dataset.detail(detail);
        let ctx = Projector::new(projection);
        let sym = &self.symbology;

        let graticule = self
            .graticule
            .iter()
            .flat_map(|line| ctx.line(line))
            .map(|points| path(points, false, StyleClass::Default, None))
            .collect();

        let mut countries = Vec::with_capacity(data.countries.len());
        for country in &data.countries {
            let class = self
                .overlays
                .highlight(country.id)
                .map(StyleClass::from)
                .unwrap_or_default();
            match country.geometry.polygons() {
                Ok(polys) => {
                    for ring in polys.into_iter().flatten() {
                        if let Some(points) = ctx.ring(ring) {
                            countries.push(path(points, true, class, Some(country.id)));
                        }
                    }
                }
                Err(e) => warn!(country = %country.id, error = %e, "skipping country"),
            }
        }

        let lakes = areas(&ctx, &data.lakes);
        let rivers = lines(&ctx, &data.rivers);

        let guide_lines = self
            .overlays
            .lines()
            .iter()
            .flat_map(|l| ctx.line(&densify(l.from, l.to, self.guide_line_step_deg)))
            .map(|points| path(points, false, StyleClass::Default, None))
            .collect();

        let markers = self
            .overlays
            .points()
            .iter()
            .filter_map(|p| ctx.marker(p))
            .map(|center| Primitive::Marker {
                center,
                radius: self.marker_radius_px,
                class: StyleClass::Default,
            })
            .collect();

        let rings = self
            .overlays
            .rings()
            .iter()
            .filter_map(|r| {
                let ring = circle_ring(r.center, r.radius, self.circle_step_deg);
                ctx.ring(&ring)
                    .map(|points| path(points, true, r.highlight.into(), Some(r.country)))
            })
            .collect();

        let layers = vec![
            layer(LayerKind::Graticule, sym.graticule, graticule),
            layer(LayerKind::Countries, sym.countries, countries),
            layer(LayerKind::Lakes, sym.lakes, lakes),
            layer(LayerKind::Rivers, sym.rivers, rivers),
            layer(LayerKind::GuideLines, sym.guide_lines, guide_lines),
            layer(LayerKind::Markers, sym.markers, markers),
            layer(LayerKind::HighlightRings, sym.highlight_rings, rings),
        ];

        RenderFrame {
            projection: projection.state(),
            detail,
            highlight_mode: self.highlight_mode,
            background: sym.background,
            correct: sym.correct,
            incorrect: sym.incorrect,
            layers,
        }
    }

    /// Marker under a screen point, if any, using the same placement as drawing.
    pub fn point_at_screen(&self, projection: &ProjectionController, xy: [f64; 2]) -> Option<LonLat> {
        let ctx = Projector::new(projection);
        self.overlays
            .points()
            .iter()
            .rev()
            .find(|p| {
                ctx.marker(p).is_some_and(|c| {
                    (c[0] - xy[0]).hypot(c[1] - xy[1]) <= self.marker_radius_px
                })
            })
            .map(|p| p.lonlat)
    }
}

fn layer(kind: LayerKind, style: LayerStyle, primitives: Vec<Primitive>) -> RenderLayer {
    RenderLayer {
        kind,
        style,
        primitives: if style.visible { primitives } else { Vec::new() },
    }
}

fn path(
    points: Vec<[f64; 2]>,
    closed: bool,
    class: StyleClass,
    country: Option<CountryId>,
) -> Primitive {
    Primitive::Path {
        points,
        closed,
        class,
        country,
    }
}

fn areas(ctx: &Projector<'_>, geometries: &[Geometry]) -> Vec<Primitive> {
    let mut out = Vec::new();
    for g in geometries {
        match g.polygons() {
            Ok(polys) => out.extend(
                polys
                    .into_iter()
                    .flatten()
                    .filter_map(|ring| ctx.ring(ring))
                    .map(|points| path(points, true, StyleClass::Default, None)),
            ),
            Err(e) => warn!(error = %e, "skipping area feature"),
        }
    }
    out
}

fn lines(ctx: &Projector<'_>, geometries: &[Geometry]) -> Vec<Primitive> {
    let mut out = Vec::new();
    for g in geometries {
        let parts: Vec<&[LonLat]> = match g {
            Geometry::LineString(line) => vec![line.as_slice()],
            Geometry::MultiLineString(lines) => lines.iter().map(Vec::as_slice).collect(),
            other => {
                warn!(kind = other.kind(), "skipping line feature");
                continue;
            }
        };
        for part in parts {
            out.extend(
                ctx.line(part)
                    .into_iter()
                    .map(|points| path(points, false, StyleClass::Default, None)),
            );
        }
    }
    out
}

/// Samples the great circle from `from` to `to` at most `step_deg` apart.
fn densify(from: LonLat, to: LonLat, step_deg: f64) -> Vec<LonLat> {
    let d = great_circle_distance(from, to).to_degrees();
    let n = (d / step_deg).ceil().max(1.0) as usize;
    (0..=n)
        .map(|i| interpolate(from, to, i as f64 / n as f64))
        .collect()
}

/// Per-frame projection helper with the view center cached.
struct Projector<'a> {
    projection: &'a ProjectionController,
    center: LonLat,
}

impl<'a> Projector<'a> {
    fn new(projection: &'a ProjectionController) -> Self {
        Self {
            projection,
            center: projection.center(),
        }
    }

    fn rim(&self, p: LonLat) -> [f64; 2] {
        self.projection
            .project_unclipped(horizon_point(self.center, p))
    }

    /// Closed ring with hidden vertices pulled onto the horizon; `None` when
    /// the whole ring is hidden.
    fn ring(&self, ring: &[LonLat]) -> Option<Vec<[f64; 2]>> {
        let mut any_visible = false;
        let points: Vec<[f64; 2]> = ring
            .iter()
            .map(|&p| match self.projection.project(p) {
                Some(xy) => {
                    any_visible = true;
                    xy
                }
                None => self.rim(p),
            })
            .collect();
        (any_visible && points.len() >= 3).then_some(points)
    }

    /// Polyline split into visible runs, each run ending on the horizon where
    /// it crosses it.
    fn line(&self, line: &[LonLat]) -> Vec<Vec<[f64; 2]>> {
        let mut runs = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        let mut prev_hidden: Option<LonLat> = None;

        for &p in line {
            match self.projection.project(p) {
                Some(xy) => {
                    if let Some(hidden) = prev_hidden.take() {
                        current.push(self.rim(hidden));
                    }
                    current.push(xy);
                }
                None => {
                    if !current.is_empty() {
                        current.push(self.rim(p));
                        runs.push(std::mem::take(&mut current));
                    }
                    prev_hidden = Some(p);
                }
            }
        }
        runs.push(current);
        runs.retain(|r| r.len() >= 2);
        runs
    }

    fn marker(&self, point: &OverlayPoint) -> Option<[f64; 2]> {
        match point.visibility {
            PointVisibility::AlwaysVisible => Some(self.projection.project_unclipped(point.lonlat)),
            PointVisibility::InvisibleBeyondHorizon => self.projection.project(point.lonlat),
            PointVisibility::VisibleOnHorizon => Some(
                self.projection
                    .project(point.lonlat)
                    .unwrap_or_else(|| self.rim(point.lonlat)),
            ),
        }
    }
}
