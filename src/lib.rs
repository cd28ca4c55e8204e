pub mod ai;
pub mod config;
pub mod display;
pub mod language;
pub mod session;

// Re-export commonly used types
pub use ai::{AiError, AnalysisReport, GeminiClient, Issue, Severity};
pub use config::Config;
pub use language::Language;
pub use session::Session;
