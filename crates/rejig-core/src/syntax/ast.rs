//! Typed AST layer over the CST
//!
//! Ergonomic, type-safe wrappers over raw CST nodes. Each wrapper implements
//! `cast()` to safely convert from a CST node. Generic expressions are passed
//! around as raw `ScriptSyntaxNode`s; wrappers exist for the shapes the
//! refactors need to take apart.

use rowan::TextSize;

use super::{ScriptSyntaxKind, ScriptSyntaxNode, ScriptSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: ScriptSyntaxKind) -> bool;
    fn cast(node: ScriptSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &ScriptSyntaxNode;
}

fn token_of_kind(parent: &ScriptSyntaxNode, kind: ScriptSyntaxKind) -> Option<ScriptSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn child_of_kind(parent: &ScriptSyntaxNode, kind: ScriptSyntaxKind) -> Option<ScriptSyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

macro_rules! ast_wrapper {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: ScriptSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: ScriptSyntaxKind) -> bool {
                kind == ScriptSyntaxKind::$kind
            }

            fn cast(node: ScriptSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &ScriptSyntaxNode {
                &self.syntax
            }
        }
    };
}

// ============================================================================
// Declarations and statements
// ============================================================================

ast_wrapper!(Root, Root);

impl Root {
    pub fn statements(&self) -> impl Iterator<Item = ScriptSyntaxNode> + '_ {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }
}

ast_wrapper!(
    /// Variable statement: `export? (const|let|var) name (= initializer)? ;`
    VarStmt,
    VarStmt
);

impl VarStmt {
    pub fn name_node(&self) -> Option<Name> {
        child_of_kind(&self.syntax, ScriptSyntaxKind::Name).and_then(Name::cast)
    }

    pub fn name(&self) -> Option<String> {
        self.name_node().map(|n| n.text())
    }

    /// The initializer expression, if any
    pub fn initializer(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }

    pub fn is_exported(&self) -> bool {
        token_of_kind(&self.syntax, ScriptSyntaxKind::ExportKw).is_some()
    }
}

ast_wrapper!(
    /// Function declaration: `export? function name(params) { body }`
    FnDecl,
    FnDecl
);

impl FnDecl {
    pub fn name_node(&self) -> Option<Name> {
        child_of_kind(&self.syntax, ScriptSyntaxKind::Name).and_then(Name::cast)
    }

    pub fn name(&self) -> Option<String> {
        self.name_node().map(|n| n.text())
    }

    pub fn params(&self) -> Vec<Param> {
        child_of_kind(&self.syntax, ScriptSyntaxKind::ParamList)
            .map(|list| list.children().filter_map(Param::cast).collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Block> {
        child_of_kind(&self.syntax, ScriptSyntaxKind::Block).and_then(Block::cast)
    }

    pub fn is_exported(&self) -> bool {
        token_of_kind(&self.syntax, ScriptSyntaxKind::ExportKw).is_some()
    }
}

ast_wrapper!(Param, Param);

impl Param {
    pub fn name_node(&self) -> Option<Name> {
        child_of_kind(&self.syntax, ScriptSyntaxKind::Name).and_then(Name::cast)
    }

    pub fn name(&self) -> Option<String> {
        self.name_node().map(|n| n.text())
    }
}

ast_wrapper!(Block, Block);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = ScriptSyntaxNode> + '_ {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }
}

ast_wrapper!(ReturnStmt, ReturnStmt);

impl ReturnStmt {
    pub fn expression(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }
}

ast_wrapper!(ExprStmt, ExprStmt);

impl ExprStmt {
    pub fn expression(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_wrapper!(
    /// Declaration-site identifier
    Name,
    Name
);

impl Name {
    pub fn ident_token(&self) -> Option<ScriptSyntaxToken> {
        token_of_kind(&self.syntax, ScriptSyntaxKind::Ident)
    }

    pub fn text(&self) -> String {
        self.ident_token()
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }
}

ast_wrapper!(
    /// Use-site identifier
    NameRef,
    NameRef
);

impl NameRef {
    pub fn ident_token(&self) -> Option<ScriptSyntaxToken> {
        token_of_kind(&self.syntax, ScriptSyntaxKind::Ident)
    }

    pub fn text(&self) -> String {
        self.ident_token()
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }
}

ast_wrapper!(Literal, Literal);

impl Literal {
    pub fn token(&self) -> Option<ScriptSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn is_string(&self) -> bool {
        self.token()
            .is_some_and(|t| t.kind() == ScriptSyntaxKind::StringLit)
    }
}

ast_wrapper!(
    /// Binary expression (never an assignment; see `AssignExpr`)
    BinaryExpr,
    BinaryExpr
);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }

    pub fn rhs(&self) -> Option<ScriptSyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind().is_expression())
            .nth(1)
    }

    pub fn operator(&self) -> Option<ScriptSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_binary_operator())
    }
}

ast_wrapper!(AssignExpr, AssignExpr);

impl AssignExpr {
    pub fn lhs(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }

    pub fn rhs(&self) -> Option<ScriptSyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind().is_expression())
            .nth(1)
    }
}

ast_wrapper!(CallExpr, CallExpr);

impl CallExpr {
    pub fn callee(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }

    pub fn arguments(&self) -> Vec<ScriptSyntaxNode> {
        child_of_kind(&self.syntax, ScriptSyntaxKind::ArgList)
            .map(|list| {
                list.children()
                    .filter(|n| n.kind().is_expression())
                    .collect()
            })
            .unwrap_or_default()
    }
}

ast_wrapper!(ParenExpr, ParenExpr);

impl ParenExpr {
    pub fn inner(&self) -> Option<ScriptSyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_expression())
    }
}

ast_wrapper!(
    /// Template literal, plain or with interpolations
    TemplateExpr,
    TemplateExpr
);

impl TemplateExpr {
    /// True when the template has no interpolations
    pub fn is_plain(&self) -> bool {
        token_of_kind(&self.syntax, ScriptSyntaxKind::NoSubTemplate).is_some()
    }

    /// The interpolated expressions, in source order
    pub fn expressions(&self) -> Vec<ScriptSyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind().is_expression())
            .collect()
    }

    /// Template text tokens (head/middle/tail or the no-substitution token),
    /// in source order
    pub fn text_tokens(&self) -> Vec<ScriptSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| {
                matches!(
                    t.kind(),
                    ScriptSyntaxKind::NoSubTemplate
                        | ScriptSyntaxKind::TemplateHead
                        | ScriptSyntaxKind::TemplateMiddle
                        | ScriptSyntaxKind::TemplateTail
                )
            })
            .collect()
    }
}

// ============================================================================
// Tree helpers
// ============================================================================

/// Nearest ancestor (inclusive) that is a statement
pub fn containing_statement(node: &ScriptSyntaxNode) -> Option<ScriptSyntaxNode> {
    node.ancestors().find(|n| {
        matches!(
            n.kind(),
            ScriptSyntaxKind::VarStmt
                | ScriptSyntaxKind::ExprStmt
                | ScriptSyntaxKind::ReturnStmt
                | ScriptSyntaxKind::FnDecl
        )
    })
}

/// Nearest enclosing scope container: function body block, plain block, or
/// the file root
pub fn enclosing_scope(node: &ScriptSyntaxNode) -> ScriptSyntaxNode {
    node.ancestors()
        .skip(1)
        .find(|n| matches!(n.kind(), ScriptSyntaxKind::Block | ScriptSyntaxKind::Root))
        .unwrap_or_else(|| node.ancestors().last().unwrap_or_else(|| node.clone()))
}

/// The non-trivia token at (or immediately left of) the given offset
pub fn token_at_offset(root: &ScriptSyntaxNode, offset: TextSize) -> Option<ScriptSyntaxToken> {
    root.token_at_offset(offset)
        .max_by_key(|t| !t.kind().is_trivia())
}
