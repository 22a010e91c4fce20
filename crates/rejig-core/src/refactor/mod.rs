//! Refactor providers and action dispatch
//!
//! Each provider answers two questions: which actions are available at a
//! cursor position, and what edits does a chosen action produce. The
//! [`RefactorRegistry`] routes external requests to providers and enforces
//! the advertise-before-apply contract: applying an action the current
//! position never advertised is a dispatch error, not a silent no-op.

pub mod convert_string;
pub mod inline_function;
pub mod inline_variable;
pub mod rewrite;

use std::path::PathBuf;

use rowan::TextSize;
use serde::Serialize;
use tracing::debug;

use crate::edit::FileEdits;
use crate::messages::action_description;
use crate::semantic::Resolver;
use crate::syntax::ast::token_at_offset;
use crate::syntax::{ScriptSyntaxNode, ScriptSyntaxToken};
use crate::{RejigError, Result};

pub use convert_string::ConvertString;
pub use inline_function::InlineFunction;
pub use inline_variable::InlineVariable;

/// Everything a provider needs to answer a request: the tree, its source
/// text, the cursor offset, and the resolver capability
pub struct RefactorContext<'a> {
    pub root: ScriptSyntaxNode,
    pub source: &'a str,
    pub offset: TextSize,
    pub resolver: &'a dyn Resolver,
    pub file: Option<PathBuf>,
}

impl<'a> RefactorContext<'a> {
    pub fn new(
        root: ScriptSyntaxNode,
        source: &'a str,
        offset: TextSize,
        resolver: &'a dyn Resolver,
    ) -> Self {
        Self {
            root,
            source,
            offset,
            resolver,
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// The non-trivia token under the cursor
    pub fn token(&self) -> Option<ScriptSyntaxToken> {
        token_at_offset(&self.root, self.offset)
    }

    /// The smallest node under the cursor
    pub fn node(&self) -> Option<ScriptSyntaxNode> {
        self.token().and_then(|t| t.parent())
    }

    fn file_edits(&self, edits: crate::edit::EditSet) -> FileEdits {
        match &self.file {
            Some(file) => FileEdits::for_file(file.clone(), edits),
            None => FileEdits::new(edits),
        }
    }
}

/// One concrete action a provider offers at the current position
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionInfo {
    pub id: &'static str,
    pub description: &'static str,
}

impl ActionInfo {
    fn new(refactor: &'static str, id: &'static str) -> Self {
        Self {
            id,
            description: action_description(refactor, id).unwrap_or(id),
        }
    }
}

/// A provider together with its currently available actions
#[derive(Debug, Clone, Serialize)]
pub struct AvailableRefactor {
    pub name: &'static str,
    pub actions: Vec<ActionInfo>,
}

/// A refactor provider
///
/// `available_actions` must be a pure query; `edits_for_action` is only
/// called with an action id the same position advertised.
pub trait Refactor {
    fn name(&self) -> &'static str;

    fn available_actions(&self, cx: &RefactorContext) -> Vec<ActionInfo>;

    fn edits_for_action(&self, cx: &RefactorContext, action: &str) -> Result<FileEdits>;
}

/// Registry routing availability and apply requests to providers
pub struct RefactorRegistry {
    providers: Vec<Box<dyn Refactor>>,
}

impl Default for RefactorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RefactorRegistry {
    /// Registry with the built-in providers
    pub fn new() -> Self {
        Self {
            providers: vec![
                Box::new(InlineVariable),
                Box::new(InlineFunction),
                Box::new(ConvertString),
            ],
        }
    }

    /// All refactors with at least one available action at the cursor
    pub fn available(&self, cx: &RefactorContext) -> Vec<AvailableRefactor> {
        self.providers
            .iter()
            .filter_map(|provider| {
                let actions = provider.available_actions(cx);
                if actions.is_empty() {
                    None
                } else {
                    Some(AvailableRefactor {
                        name: provider.name(),
                        actions,
                    })
                }
            })
            .collect()
    }

    /// Apply one action of one refactor at the cursor
    ///
    /// Fails with a dispatch error when the refactor name is unknown or the
    /// action was not advertised for this position.
    pub fn apply(&self, cx: &RefactorContext, refactor: &str, action: &str) -> Result<FileEdits> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.name() == refactor)
            .ok_or_else(|| RejigError::UnknownRefactor(refactor.to_string()))?;

        if !provider
            .available_actions(cx)
            .iter()
            .any(|a| a.id == action)
        {
            return Err(RejigError::invalid_action(refactor, action));
        }

        debug!(refactor, action, offset = ?cx.offset, "applying refactor");
        provider.edits_for_action(cx, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::LexicalResolver;
    use crate::syntax::parse;

    fn offset_of(source: &str, needle: &str) -> TextSize {
        TextSize::from(source.find(needle).unwrap() as u32)
    }

    #[test]
    fn unknown_refactor_is_a_dispatch_error() {
        let source = "const x = 1;\nuse(x);";
        let root = parse(source).root;
        let resolver = LexicalResolver::analyze(&root);
        let cx = RefactorContext::new(root.clone(), source, offset_of(source, "x"), &resolver);
        let registry = RefactorRegistry::new();
        assert!(matches!(
            registry.apply(&cx, "extract-method", "anything"),
            Err(RejigError::UnknownRefactor(_))
        ));
    }

    #[test]
    fn unadvertised_action_is_a_dispatch_error() {
        // Cursor on the declaration name: "inline-here" is not offered.
        let source = "const x = 1;\nuse(x);";
        let root = parse(source).root;
        let resolver = LexicalResolver::analyze(&root);
        let cx = RefactorContext::new(root.clone(), source, offset_of(source, "x"), &resolver);
        let registry = RefactorRegistry::new();
        assert!(matches!(
            registry.apply(&cx, "inline-variable", "inline-here"),
            Err(RejigError::InvalidAction { .. })
        ));
    }

    #[test]
    fn availability_lists_only_nonempty_providers() {
        let source = "const x = 1;\nuse(x);";
        let root = parse(source).root;
        let resolver = LexicalResolver::analyze(&root);
        let cx = RefactorContext::new(root.clone(), source, offset_of(source, "x"), &resolver);
        let registry = RefactorRegistry::new();
        let available = registry.available(&cx);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "inline-variable");
        assert!(available[0].actions.iter().all(|a| !a.description.is_empty()));
    }
}
