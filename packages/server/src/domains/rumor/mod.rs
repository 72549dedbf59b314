//! Rumor domain - persistence, the query funnel and the submission
//! pipeline.

pub mod actions;
pub mod models;

pub use models::{NewRumor, RumorRecord};
