pub mod types;
pub mod redis;
pub mod config;

// Re-export commonly used types for convenience
pub use types::{
    ComparisonMode, ExecutionRequest, ExecutionResult, QuestionRecord, StoredTest, TestCase,
    TestOutcome, TestVerdict, VerificationResult,
};
pub use config::Config;
