#[path = "evaluator/judge.rs"]
mod judge;

#[path = "evaluator/batch.rs"]
mod batch;

pub use batch::{BatchReport, CaseResult};
pub use judge::Evaluator;
