//! Answer verification engine
//!
//! `Verifier::check_answer` resolves a question's test cases, runs each one
//! on a remote code-execution service and compares outputs.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod language_config;
pub mod resolver;


pub use catalog::{InMemoryCatalog, QuestionCatalog, RedisCatalog};
pub use engine::{CodeEngine, RemoteEngine};
pub use error::{CatalogError, CheckError, ExecutorError};
pub use evaluator::{compare, compare_default, DEFAULT_TOLERANCE};
pub use executor::Verifier;
pub use language_config::{ExecutorLanguageCode, LanguageTable};
