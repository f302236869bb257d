//! Transform stage: raw issue files to a flat training corpus

pub mod prompts;
pub mod record;
pub mod text;
pub mod transformer;

pub use prompts::{FnTemplate, PromptInput, PromptSet, PromptTemplate};
pub use record::{DerivedPrompts, NormalizedRecord, RawIssue};
pub use text::clean_text;
pub use transformer::{FileSummary, TransformError, TransformSummary, Transformer};
