pub mod adjacency;
pub mod dataset;
pub mod geojson;
pub mod loader;
pub mod manifest;

pub use adjacency::*;
pub use dataset::*;
pub use geojson::*;
pub use loader::*;
pub use manifest::*;
