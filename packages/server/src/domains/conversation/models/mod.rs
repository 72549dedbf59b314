pub mod session;

pub use session::{Criteria, FindStep, Flow, RumorDraft, Session, SessionStore, SubmitStep};
