//! Green-tree builder wrapper
//!
//! Thin wrapper over Rowan's `GreenNodeBuilder` that works in terms of
//! `ScriptSyntaxKind` and exposes checkpoints for wrapping already-built
//! prefixes into new nodes (used by the expression parser).

use rowan::{Checkpoint, GreenNodeBuilder, Language};

use super::{ScriptLanguage, ScriptSyntaxKind, ScriptSyntaxNode};

/// Builder for script CSTs
pub struct TreeBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: ScriptSyntaxKind) {
        self.inner.start_node(ScriptLanguage::kind_to_raw(kind));
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: ScriptSyntaxKind) {
        self.inner
            .start_node_at(checkpoint, ScriptLanguage::kind_to_raw(kind));
    }

    pub fn token(&mut self, kind: ScriptSyntaxKind, text: &str) {
        self.inner.token(ScriptLanguage::kind_to_raw(kind), text);
    }

    pub fn finish(self) -> ScriptSyntaxNode {
        ScriptSyntaxNode::new_root(self.inner.finish())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
