//! Orthographic globe: projection state, headless rendering, overlays, pointer
//! interaction and animated transitions, driven by a deterministic scheduler.

pub mod config;
pub mod globe;
pub mod graticule;
pub mod interaction;
pub mod overlays;
pub mod projection;
pub mod render;
pub mod symbology;
pub mod transition;

pub use config::GlobeConfig;
pub use globe::{ClickHandler, Globe, GlobeError, GlobeEvent, RotationDirection, TransitionCallback};
pub use interaction::{InteractionController, InteractionEffect};
pub use overlays::{GuideLine, Highlight, HighlightRing, OverlayPoint, Overlays, PointVisibility};
pub use projection::{ProjectionController, ProjectionState, Viewport, ZoomCurve};
pub use render::{
    DrawReport, LayerKind, NullTarget, Primitive, RecordingTarget, RenderFrame, RenderLayer,
    RenderLoop, RenderTarget, StyleClass,
};
pub use symbology::{LayerStyle, Rgba, Symbology};
pub use transition::Transition;
