//! Inline a local variable into its usages
//!
//! Applicable when the cursor sits on a variable declaration name or on one
//! of its usages, the declaration has an initializer, is not exported, and
//! the variable is never reassigned. Substitution re-parenthesizes the
//! initializer per usage position; re-evaluating the initializer at each
//! usage is the accepted semantic of "inline".

use tracing::debug;

use crate::edit::{EditSet, FileEdits};
use crate::semantic::references_in_scope;
use crate::syntax::ast::{enclosing_scope, AstNode, VarStmt};
use crate::syntax::{ScriptSyntaxKind, ScriptSyntaxNode};
use crate::{RejigError, Result};

use super::rewrite::{parenthesize_if_needed, statement_deletion_range};
use super::{ActionInfo, Refactor, RefactorContext};

const NAME: &str = "inline-variable";

pub struct InlineVariable;

struct Candidate {
    declaration: VarStmt,
    initializer: ScriptSyntaxNode,
    /// Use-site references, in source order
    usages: Vec<ScriptSyntaxNode>,
    /// The usage under the cursor, when the cursor is on a use site
    selected: Option<ScriptSyntaxNode>,
}

fn is_assignment_target(usage: &ScriptSyntaxNode) -> bool {
    usage.parent().is_some_and(|parent| {
        parent.kind() == ScriptSyntaxKind::AssignExpr
            && parent
                .children()
                .find(|n| n.kind().is_expression())
                .is_some_and(|lhs| &lhs == usage)
    })
}

fn locate(cx: &RefactorContext) -> Option<Candidate> {
    let node = cx.node()?;
    if !matches!(
        node.kind(),
        ScriptSyntaxKind::Name | ScriptSyntaxKind::NameRef
    ) {
        return None;
    }
    let symbol = cx.resolver.symbol_of(&node)?;
    let declaration = VarStmt::cast(cx.resolver.declaration_of(symbol)?)?;
    let initializer = declaration.initializer()?;
    if declaration.is_exported() {
        return None;
    }

    let scope = enclosing_scope(declaration.syntax());
    let usages = references_in_scope(&scope, symbol, cx.resolver, false);
    if usages.iter().any(is_assignment_target) {
        debug!(symbol = ?symbol, "variable is reassigned, not inlinable");
        return None;
    }

    let selected = (node.kind() == ScriptSyntaxKind::NameRef).then_some(node);
    Some(Candidate {
        declaration,
        initializer,
        usages,
        selected,
    })
}

fn inline_usage(edits: &mut EditSet, usage: &ScriptSyntaxNode, initializer: &ScriptSyntaxNode) {
    edits.replace_node(usage, parenthesize_if_needed(usage, initializer));
}

impl Refactor for InlineVariable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn available_actions(&self, cx: &RefactorContext) -> Vec<ActionInfo> {
        let Some(candidate) = locate(cx) else {
            return Vec::new();
        };
        let mut actions = vec![ActionInfo::new(NAME, "inline-all")];
        if candidate.selected.is_some() {
            actions.push(ActionInfo::new(NAME, "inline-here"));
        }
        actions
    }

    fn edits_for_action(&self, cx: &RefactorContext, action: &str) -> Result<FileEdits> {
        let candidate = locate(cx)
            .ok_or_else(|| RejigError::internal("inline-variable applied at inapplicable position"))?;
        let mut edits = EditSet::new();

        match action {
            "inline-all" => {
                for usage in &candidate.usages {
                    inline_usage(&mut edits, usage, &candidate.initializer);
                }
                edits.delete(statement_deletion_range(candidate.declaration.syntax()));
            }
            "inline-here" => {
                let selected = candidate
                    .selected
                    .as_ref()
                    .ok_or_else(|| RejigError::invalid_action(NAME, action))?;
                inline_usage(&mut edits, selected, &candidate.initializer);
                if candidate.usages.len() == 1 {
                    edits.delete(statement_deletion_range(candidate.declaration.syntax()));
                }
            }
            other => return Err(RejigError::invalid_action(NAME, other)),
        }

        Ok(cx.file_edits(edits))
    }
}
