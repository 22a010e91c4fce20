//! Lossless syntax trees for the script language
//!
//! Rowan green/red trees: the green tree is immutable, position-independent
//! storage; the red tree is the on-demand view with parent pointers used for
//! traversal. All trivia (whitespace, comments, newlines) is preserved, so
//! `parse(source).root.text() == source` holds for every input.
//!
//! Transformations never mutate these trees. The refactor layer reads them
//! and records text edits against the original source instead.

mod builder;
mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod ast;

pub use builder::TreeBuilder;
pub use language::{ScriptLanguage, ScriptSyntaxElement, ScriptSyntaxNode, ScriptSyntaxToken};
pub use lexer::{LexResult, LexerError, Token, lex};
pub use parser::{Parse, ParseError, parse};
pub use syntax_kind::{ScriptSyntaxKind, keyword_kind};
