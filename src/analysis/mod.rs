pub mod client;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod query;
pub mod trace;
pub mod types;

pub use client::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use query::*;
pub use trace::*;
pub use types::*;

use thiserror::Error;

/// Umbrella error for a single analysis request.
///
/// Each variant keeps its source's message intact — the HTTP layer maps
/// the variant to a status code and forwards the message verbatim.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
