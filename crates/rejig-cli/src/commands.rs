//! CLI command implementations

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::debug;

use rejig_core::{
    parse, spelling_fix, LevenshteinOracle, LexicalResolver, Parse, RefactorContext,
    RefactorRegistry, SpellingFix, TextSize,
};

use crate::output::print_diff;

fn load(file: &Path) -> Result<(String, Parse)> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = parse(&source);
    if let Some(first) = parsed.errors.first() {
        bail!(
            "{} does not parse: {} at {}..{}",
            file.display(),
            first.message,
            first.span.start,
            first.span.end
        );
    }
    Ok((source, parsed))
}

fn check_offset(source: &str, at: u32, file: &Path) -> Result<TextSize> {
    if at as usize > source.len() {
        bail!(
            "offset {at} is past the end of {} ({} bytes)",
            file.display(),
            source.len()
        );
    }
    Ok(TextSize::from(at))
}

#[derive(Serialize)]
struct SpellingReport {
    start: u32,
    end: u32,
    original: String,
    suggestion: String,
}

impl From<SpellingFix> for SpellingReport {
    fn from(fix: SpellingFix) -> Self {
        Self {
            start: fix.range.start().into(),
            end: fix.range.end().into(),
            original: fix.original,
            suggestion: fix.suggestion,
        }
    }
}

#[derive(Serialize)]
struct ActionsReport {
    refactors: Vec<rejig_core::AvailableRefactor>,
    spelling_fix: Option<SpellingReport>,
}

/// `rejig actions`: report what is available at the cursor as JSON
pub fn actions_command(file: &Path, at: u32) -> Result<()> {
    let (source, parsed) = load(file)?;
    let offset = check_offset(&source, at, file)?;
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), &source, offset, &resolver).with_file(file);

    let registry = RefactorRegistry::new();
    let refactors = registry.available(&cx);
    let fix = spelling_fix(&cx, &LevenshteinOracle);
    debug!(count = refactors.len(), "refactors available");

    let report = ActionsReport {
        refactors,
        spelling_fix: fix.map(SpellingReport::from),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn emit(file: &Path, source: &str, new_text: &str, write: bool, diff: bool) -> Result<()> {
    if diff {
        print_diff(source, new_text);
    }
    if write {
        fs::write(file, new_text)
            .with_context(|| format!("failed to write {}", file.display()))?;
    } else if !diff {
        print!("{new_text}");
    }
    Ok(())
}

/// `rejig apply`: run one refactor action and emit the result
pub fn apply_command(
    file: &Path,
    at: u32,
    refactor: &str,
    action: &str,
    write: bool,
    diff: bool,
) -> Result<()> {
    let (source, parsed) = load(file)?;
    let offset = check_offset(&source, at, file)?;
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), &source, offset, &resolver).with_file(file);

    let registry = RefactorRegistry::new();
    let edits = registry.apply(&cx, refactor, action)?;
    let new_text = edits.edits.render(&source)?;
    emit(file, &source, &new_text, write, diff)
}

/// `rejig fix`: apply the spelling correction at the cursor
pub fn fix_command(file: &Path, at: u32, write: bool, diff: bool) -> Result<()> {
    let (source, parsed) = load(file)?;
    let offset = check_offset(&source, at, file)?;
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), &source, offset, &resolver).with_file(file);

    let Some(fix) = spelling_fix(&cx, &LevenshteinOracle) else {
        bail!("no spelling fix available at offset {at}");
    };
    debug!(original = %fix.original, suggestion = %fix.suggestion, "applying spelling fix");

    let edits = rejig_core::spelling_edits(&cx, &LevenshteinOracle)
        .context("spelling fix vanished between query and apply")?;
    let new_text = edits.edits.render(&source)?;
    emit(file, &source, &new_text, write, diff)
}
