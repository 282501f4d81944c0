//! Orchestrator
//!
//! Converges text and voice submits onto one downstream pipeline:
//! user message -> response generation -> speech synthesis -> timeline.

mod generator;
mod orchestrator;

pub use generator::{KeywordResponder, ResponseGenerator};
pub use orchestrator::Assistant;
