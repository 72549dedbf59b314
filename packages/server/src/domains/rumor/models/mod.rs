pub mod rumor;

pub use rumor::{NewRumor, RumorRecord};
