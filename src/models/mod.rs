pub mod question;
pub mod topic;

pub use question::{GradingResult, Label, Question, UserSelection};
pub use topic::ExamTopic;
