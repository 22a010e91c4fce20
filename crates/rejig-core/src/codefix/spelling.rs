//! Correct a misspelled identifier to a visible name
//!
//! Applies when the cursor sits on a name reference the resolver cannot
//! bind. The candidate pool is every symbol visible at that position; the
//! [`SuggestionOracle`] picks the best match, with [`LevenshteinOracle`] as
//! the shipped default.

use tracing::debug;

use rowan::TextRange;

use crate::edit::{EditSet, FileEdits};
use crate::refactor::RefactorContext;
use crate::semantic::Symbol;
use crate::syntax::ScriptSyntaxKind;

/// Picks the best replacement for a name that failed to resolve
pub trait SuggestionOracle {
    fn suggest(&self, misspelled: &str, candidates: &[Symbol]) -> Option<String>;
}

/// Default oracle: closest candidate by edit distance
///
/// A suggestion is only made when the distance is small relative to the
/// misspelled name, so short names do not get rewritten into arbitrary
/// unrelated identifiers.
#[derive(Debug, Default)]
pub struct LevenshteinOracle;

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

impl SuggestionOracle for LevenshteinOracle {
    fn suggest(&self, misspelled: &str, candidates: &[Symbol]) -> Option<String> {
        let budget = (misspelled.chars().count() / 3).max(1);
        candidates
            .iter()
            .filter(|s| s.name != misspelled)
            .map(|s| (levenshtein(misspelled, &s.name), &s.name))
            .filter(|(distance, _)| *distance <= budget)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name.clone())
    }
}

/// A suggested correction for one unresolved name reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingFix {
    pub range: TextRange,
    pub original: String,
    pub suggestion: String,
}

/// The spelling correction available at the cursor, if any
pub fn spelling_fix(cx: &RefactorContext, oracle: &dyn SuggestionOracle) -> Option<SpellingFix> {
    let node = cx.node()?;
    if node.kind() != ScriptSyntaxKind::NameRef {
        return None;
    }
    // A name that resolves is spelled the way the author meant it.
    if cx.resolver.symbol_of(&node).is_some() {
        return None;
    }
    let original = node.text().to_string();
    let candidates = cx.resolver.visible_symbols(&node);
    let suggestion = oracle.suggest(&original, &candidates)?;
    debug!(original, suggestion, "spelling fix available");
    Some(SpellingFix {
        range: node.text_range(),
        original,
        suggestion,
    })
}

/// Edits applying the spelling correction at the cursor
pub fn spelling_edits(cx: &RefactorContext, oracle: &dyn SuggestionOracle) -> Option<FileEdits> {
    let fix = spelling_fix(cx, oracle)?;
    let mut edits = EditSet::new();
    edits.replace(fix.range, fix.suggestion);
    Some(match &cx.file {
        Some(file) => FileEdits::for_file(file.clone(), edits),
        None => FileEdits::new(edits),
    })
}
