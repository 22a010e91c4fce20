//! Code fixes: small targeted corrections, distinct from refactors
//!
//! A refactor preserves behavior by construction; a code fix repairs code
//! that is already wrong. The only fix shipped here corrects misspelled
//! identifiers against the names visible in scope.

mod spelling;

pub use spelling::{spelling_edits, spelling_fix, LevenshteinOracle, SpellingFix, SuggestionOracle};
