//! Geodesic scoring for the quiz: questions, answers and seeded question sets.

pub mod error;
pub mod question;
pub mod question_set;
pub mod scoring;

pub use error::*;
pub use question::*;
pub use question_set::*;
pub use scoring::*;
