//! Lexical resolver: a single-pass binder over one source tree
//!
//! Scope model: the file root, each function (parameters plus body), and each
//! standalone block. Function declarations are hoisted within their scope;
//! `const`/`let`/`var` bind from their declaration statement onward. Names
//! that never resolve stay unbound and `symbol_of` returns `None` for them —
//! that is what the spelling code fix keys off.
//!
//! This is intentionally not a full binder. It resolves exactly the shapes
//! the script grammar can produce, and the refactors treat its answers as
//! authoritative: a shadowed occurrence resolves to the inner symbol, so
//! reference walks need no shadow bookkeeping of their own.

use std::collections::HashMap;

use indexmap::IndexMap;
use rowan::TextRange;
use tracing::trace;

use crate::syntax::ast::{AstNode, FnDecl, Param, VarStmt};
use crate::syntax::{ScriptSyntaxKind, ScriptSyntaxNode};

use super::{Resolver, Symbol, SymbolId, SymbolKind};

#[derive(Debug)]
struct Scope {
    parent: Option<usize>,
    range: TextRange,
    /// Name -> symbol, in declaration order; holds every name declared
    /// anywhere in the scope once binding is complete.
    names: IndexMap<String, SymbolId>,
}

/// Shipped [`Resolver`] implementation backed by one binding pass
pub struct LexicalResolver {
    symbols: Vec<Symbol>,
    /// Declaring node per symbol, indexed by `SymbolId`
    declarations: Vec<ScriptSyntaxNode>,
    /// Binding of every resolved `Name`/`NameRef` node, keyed by range
    bindings: HashMap<TextRange, SymbolId>,
    scopes: Vec<Scope>,
}

impl LexicalResolver {
    /// Bind an entire tree
    pub fn analyze(root: &ScriptSyntaxNode) -> Self {
        let mut binder = Binder {
            resolver: LexicalResolver {
                symbols: Vec::new(),
                declarations: Vec::new(),
                bindings: HashMap::new(),
                scopes: Vec::new(),
            },
        };
        let file_scope = binder.push_scope(None, root.text_range());
        binder.bind_scope_children(root, file_scope);
        trace!(
            symbols = binder.resolver.symbols.len(),
            scopes = binder.resolver.scopes.len(),
            "binding complete"
        );
        binder.resolver
    }

    /// Innermost scope containing the node
    fn scope_at(&self, node: &ScriptSyntaxNode) -> Option<usize> {
        let position = node.text_range().start();
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.range.contains_inclusive(position))
            .max_by_key(|(_, s)| s.range.start())
            .map(|(i, _)| i)
    }
}

impl Resolver for LexicalResolver {
    fn symbol_of(&self, node: &ScriptSyntaxNode) -> Option<SymbolId> {
        self.bindings.get(&node.text_range()).copied()
    }

    fn visible_symbols(&self, node: &ScriptSyntaxNode) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = Vec::new();
        let mut scope = self.scope_at(node);
        while let Some(index) = scope {
            let scope_data = &self.scopes[index];
            for (name, &id) in &scope_data.names {
                if !out.iter().any(|s| &s.name == name) {
                    out.push(self.symbols[id.0 as usize].clone());
                }
            }
            scope = scope_data.parent;
        }
        out
    }

    fn declaration_of(&self, symbol: SymbolId) -> Option<ScriptSyntaxNode> {
        self.declarations.get(symbol.0 as usize).cloned()
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }
}

struct Binder {
    resolver: LexicalResolver,
}

impl Binder {
    fn push_scope(&mut self, parent: Option<usize>, range: TextRange) -> usize {
        self.resolver.scopes.push(Scope {
            parent,
            range,
            names: IndexMap::new(),
        });
        self.resolver.scopes.len() - 1
    }

    fn declare(
        &mut self,
        scope: usize,
        name_node: &ScriptSyntaxNode,
        kind: SymbolKind,
        declaration: ScriptSyntaxNode,
    ) -> SymbolId {
        let id = SymbolId(self.resolver.symbols.len() as u32);
        let name = name_node.text().to_string();
        self.resolver.symbols.push(Symbol {
            id,
            name: name.clone(),
            kind,
            declaration: name_node.text_range(),
        });
        self.resolver.declarations.push(declaration);
        self.resolver.scopes[scope].names.insert(name, id);
        self.resolver.bindings.insert(name_node.text_range(), id);
        id
    }

    fn lookup(&self, mut scope: Option<usize>, name: &str) -> Option<SymbolId> {
        while let Some(index) = scope {
            let scope_data = &self.resolver.scopes[index];
            if let Some(&id) = scope_data.names.get(name) {
                return Some(id);
            }
            scope = scope_data.parent;
        }
        None
    }

    /// Bind the statements directly inside a scope container (root, block,
    /// or function body). Function declarations hoist; variables bind at
    /// their statement.
    fn bind_scope_children(&mut self, container: &ScriptSyntaxNode, scope: usize) {
        // Hoisting pass: function names are visible before their declaration.
        for child in container.children() {
            if let Some(decl) = FnDecl::cast(child.clone())
                && let Some(name) = decl.name_node()
            {
                self.declare(
                    scope,
                    name.syntax(),
                    SymbolKind::Function,
                    decl.syntax().clone(),
                );
            }
        }

        for child in container.children() {
            self.bind_statement(&child, scope);
        }
    }

    fn bind_statement(&mut self, node: &ScriptSyntaxNode, scope: usize) {
        match node.kind() {
            ScriptSyntaxKind::VarStmt => {
                let stmt = VarStmt::cast(node.clone()).expect("kind checked");
                // Initializer first: `const x = x` must not see the new x.
                if let Some(init) = stmt.initializer() {
                    self.bind_expression(&init, scope);
                }
                if let Some(name) = stmt.name_node() {
                    self.declare(scope, name.syntax(), SymbolKind::Variable, node.clone());
                }
            }
            ScriptSyntaxKind::FnDecl => {
                let decl = FnDecl::cast(node.clone()).expect("kind checked");
                // Name was declared during hoisting.
                let fn_scope = self.push_scope(Some(scope), node.text_range());
                for param in decl.params() {
                    if let Some(name) = Param::name_node(&param) {
                        self.declare(
                            fn_scope,
                            name.syntax(),
                            SymbolKind::Parameter,
                            param.syntax().clone(),
                        );
                    }
                }
                if let Some(body) = decl.body() {
                    self.bind_scope_children(body.syntax(), fn_scope);
                }
            }
            ScriptSyntaxKind::Block => {
                let block_scope = self.push_scope(Some(scope), node.text_range());
                self.bind_scope_children(node, block_scope);
            }
            ScriptSyntaxKind::ReturnStmt | ScriptSyntaxKind::ExprStmt => {
                for child in node.children() {
                    self.bind_expression(&child, scope);
                }
            }
            _ => {}
        }
    }

    /// Resolve every `NameRef` in an expression subtree
    ///
    /// The grammar has no scope-introducing expressions, so a plain descent
    /// is sufficient.
    fn bind_expression(&mut self, node: &ScriptSyntaxNode, scope: usize) {
        for descendant in node.descendants() {
            if descendant.kind() == ScriptSyntaxKind::NameRef {
                let name = descendant.text().to_string();
                if let Some(id) = self.lookup(Some(scope), &name) {
                    self.resolver.bindings.insert(descendant.text_range(), id);
                }
            }
        }
    }
}
