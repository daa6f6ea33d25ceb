pub mod reply;
pub mod submission;

pub use reply::{HealthReply, SubmitReply};
pub use submission::{SubmissionForm, SubmissionRecord};
