//! Rejig Core
//!
//! Source-rewriting engine for a small script language. This crate provides
//! the lossless syntax tree, the lexical resolver, the edit ledger, and the
//! refactor providers (inline variable, inline function, string
//! concatenation ⇄ template conversion) plus the spelling code fix.

pub mod codefix;
pub mod edit;
pub mod error;
pub mod messages;
pub mod refactor;
pub mod result;
pub mod semantic;
pub mod syntax;

// Re-export commonly used types
pub use codefix::{
    spelling_edits, spelling_fix, LevenshteinOracle, SpellingFix, SuggestionOracle,
};
pub use edit::{Edit, EditSet, FileEdits};
pub use error::{ErrorKind, RejigError};
pub use refactor::{
    ActionInfo, AvailableRefactor, ConvertString, InlineFunction, InlineVariable, Refactor,
    RefactorContext, RefactorRegistry,
};
pub use result::Result;
pub use semantic::{
    references_in_scope, LexicalResolver, Resolver, Symbol, SymbolId, SymbolKind,
};
pub use syntax::{parse, Parse, ScriptLanguage, ScriptSyntaxKind, ScriptSyntaxNode};

// Text positions come from rowan
pub use rowan::{TextRange, TextSize};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rejig=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
