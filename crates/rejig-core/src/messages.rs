//! Human-readable descriptions for refactor actions
//!
//! Kept in one table so user-facing wording lives apart from the engine.
//! Action ids are stable; descriptions may be reworded freely.

/// Description for a (refactor, action) pair
pub fn action_description(refactor: &str, action: &str) -> Option<&'static str> {
    match (refactor, action) {
        ("inline-variable", "inline-all") => Some("Inline variable at all usages"),
        ("inline-variable", "inline-here") => Some("Inline variable at this usage"),
        ("inline-function", "inline-all") => Some("Inline function at all call sites"),
        ("inline-function", "inline-here") => Some("Inline function at this call site"),
        ("convert-string", "to-template") => Some("Convert to template literal"),
        ("convert-string", "to-concatenation") => Some("Convert to string concatenation"),
        _ => None,
    }
}
