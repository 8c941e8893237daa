//! File-based configuration: grammar descriptions and user settings.

pub mod grammar_file;
pub mod settings;

pub use grammar_file::{Grammar, GrammarFile, LoadError, RuleError, TermDef};
pub use settings::Settings;
