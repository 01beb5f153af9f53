#[path = "builder/backend.rs"]
mod backend;

#[path = "builder/judge_builder.rs"]
mod judge_builder;

#[path = "builder/state.rs"]
mod state;

#[path = "builder/resilience.rs"]
mod resilience;

#[path = "builder/build.rs"]
mod build;

pub use backend::JudgeBackend;
pub use judge_builder::JudgeBuilder;
