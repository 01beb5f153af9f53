#[path = "evaluation/category.rs"]
mod category;

#[path = "evaluation/result.rs"]
mod result;

#[path = "evaluation/parser.rs"]
mod parser;

#[path = "evaluation/summary.rs"]
mod summary;

pub use category::Category;
pub use parser::parse_evaluation;
pub use result::{EvaluationResult, FAILURE_MARKER, MISSING_JUSTIFICATION};
pub use summary::BatchSummary;
