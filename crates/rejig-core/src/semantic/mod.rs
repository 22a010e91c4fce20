//! Semantic layer: symbols and the resolver capability
//!
//! The rewriting engine never recomputes name binding itself; it consumes a
//! [`Resolver`] with three read-only queries. [`LexicalResolver`] is the
//! shipped implementation, a deliberately small lexical binder that is
//! exactly enough to drive the refactors. Symbol equality is identity-based:
//! two references denote the same declaration iff their `SymbolId`s are
//! equal.

mod references;
mod resolver;

pub use references::references_in_scope;
pub use resolver::LexicalResolver;

use rowan::TextRange;

use crate::syntax::ScriptSyntaxNode;

/// Opaque identity of a resolved declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// What kind of declaration a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
}

/// A resolved declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    /// Range of the declaring `Name` node
    pub declaration: TextRange,
}

/// Symbol-resolution capability consumed by the rewriting engine
///
/// Implementations must be safe for concurrent read-only queries; the engine
/// itself never mutates resolver state.
pub trait Resolver {
    /// The symbol a `NameRef` or `Name` node denotes, if it resolves
    fn symbol_of(&self, node: &ScriptSyntaxNode) -> Option<SymbolId>;

    /// All symbols visible at the given node, innermost scope first
    ///
    /// A shadowed outer binding is not reported; only the winning binding for
    /// each name appears.
    fn visible_symbols(&self, node: &ScriptSyntaxNode) -> Vec<Symbol>;

    /// The declaring node for a symbol: the `VarStmt`, `FnDecl`, or `Param`
    fn declaration_of(&self, symbol: SymbolId) -> Option<ScriptSyntaxNode>;

    /// Metadata for a symbol id
    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;
}
