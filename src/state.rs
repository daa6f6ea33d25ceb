use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::SubmissionRateLimiter;
use crate::submission::SubmissionHandler;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Arc<Config>,
    pub handler: SubmissionHandler,
    pub submission_limiter: SubmissionRateLimiter,
}
