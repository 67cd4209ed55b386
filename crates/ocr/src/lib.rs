pub mod checker;
pub mod extract;
pub mod keywords;
pub mod pipeline;
pub mod recognizer;
pub mod select;
pub mod types;

pub use checker::{evaluate, ExpiryChecker};
pub use extract::{normalize, Extractor};
pub use keywords::{KeywordError, KeywordSet, DEFAULT_KEYWORDS};
pub use pipeline::{ExpiryPipeline, PipelineError};
pub use recognizer::{join_lines, MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use select::select_best;
pub use types::{Candidate, RawMatch, SelectionRule, Verdict};
