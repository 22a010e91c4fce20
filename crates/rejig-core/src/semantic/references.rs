//! Scope reference finder
//!
//! Walks a scope subtree in source order and collects the name nodes that
//! resolve to a target symbol. The resolver is authoritative for shadowing:
//! an identically-spelled name bound by a nested redeclaration resolves to a
//! different symbol and falls out naturally, with no shadow tracking here.

use tracing::debug;

use crate::semantic::{Resolver, SymbolId};
use crate::syntax::{ScriptSyntaxKind, ScriptSyntaxNode};

/// Ordered references to `target` within the subtree rooted at `scope`
///
/// Source order, one entry per source occurrence. Declaration-site `Name`
/// nodes are excluded unless `include_declaration` is set; use sites are
/// `NameRef` nodes.
pub fn references_in_scope(
    scope: &ScriptSyntaxNode,
    target: SymbolId,
    resolver: &dyn Resolver,
    include_declaration: bool,
) -> Vec<ScriptSyntaxNode> {
    let refs: Vec<ScriptSyntaxNode> = scope
        .descendants()
        .filter(|node| match node.kind() {
            ScriptSyntaxKind::NameRef => true,
            ScriptSyntaxKind::Name => include_declaration,
            _ => false,
        })
        .filter(|node| resolver.symbol_of(node) == Some(target))
        .collect();
    debug!(count = refs.len(), ?target, "collected references");
    refs
}
