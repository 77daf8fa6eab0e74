pub mod quiz_flow;
pub mod quiz_session;

pub use quiz_flow::QuizFlow;
pub use quiz_session::{Phase, QuizSession, SessionState};
