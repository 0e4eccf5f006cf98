pub mod bounds;
pub mod geometry;
pub mod ids;
pub mod math;
pub mod time;

// Foundation crate: pure spherical math and small primitives only.
pub use bounds::*;
pub use geometry::*;
pub use ids::*;
pub use time::*;
