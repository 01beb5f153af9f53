#[path = "resilient/config.rs"]
mod config;

#[path = "resilient/retry.rs"]
mod retry;

#[path = "resilient/wrapper.rs"]
mod wrapper;

pub use config::ResilienceConfig;
pub use retry::retry;
pub use wrapper::ResilientJudge;
