pub mod funnel;
pub mod submit;

pub use submit::submit_rumor;
