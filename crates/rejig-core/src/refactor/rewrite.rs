//! Precedence-aware rewriting helpers shared by the refactor providers
//!
//! The central question every substitution-based refactor asks is: "if I drop
//! this rendered expression where that node used to be, does the result still
//! parse the same way?" [`parenthesize_if_needed`] answers it with the
//! operator precedence table below. The statement-level helpers deal with the
//! surrounding text: deletion ranges that swallow the line, indentation for
//! hoisted statements, fresh names that avoid a visibility set.

use rowan::{TextRange, TextSize};

use crate::syntax::ast::AstNode;
use crate::syntax::ast::BinaryExpr;
use crate::syntax::{ScriptSyntaxKind, ScriptSyntaxNode};

/// Binding strength of a binary operator token
///
/// Higher binds tighter. The gaps leave room for operator families the
/// grammar may grow.
pub fn operator_precedence(kind: ScriptSyntaxKind) -> u8 {
    match kind {
        ScriptSyntaxKind::StarStar => 80,
        ScriptSyntaxKind::Star | ScriptSyntaxKind::Slash | ScriptSyntaxKind::Percent => 70,
        ScriptSyntaxKind::Plus | ScriptSyntaxKind::Minus => 60,
        ScriptSyntaxKind::Lt
        | ScriptSyntaxKind::Gt
        | ScriptSyntaxKind::LtEq
        | ScriptSyntaxKind::GtEq => 50,
        ScriptSyntaxKind::EqEq | ScriptSyntaxKind::BangEq => 40,
        ScriptSyntaxKind::AmpAmp => 30,
        ScriptSyntaxKind::PipePipe => 20,
        _ => 0,
    }
}

/// Top-level binding strength of an expression node
pub fn expression_precedence(node: &ScriptSyntaxNode) -> u8 {
    match node.kind() {
        ScriptSyntaxKind::NameRef
        | ScriptSyntaxKind::Literal
        | ScriptSyntaxKind::TemplateExpr
        | ScriptSyntaxKind::TaggedTemplate
        | ScriptSyntaxKind::ParenExpr
        | ScriptSyntaxKind::CallExpr
        | ScriptSyntaxKind::MemberExpr => 100,
        ScriptSyntaxKind::UnaryExpr => 90,
        ScriptSyntaxKind::BinaryExpr => BinaryExpr::cast(node.clone())
            .and_then(|b| b.operator())
            .map(|op| operator_precedence(op.kind()))
            .unwrap_or(0),
        ScriptSyntaxKind::AssignExpr => 10,
        _ => 0,
    }
}

fn is_right_associative(op: ScriptSyntaxKind) -> bool {
    op == ScriptSyntaxKind::StarStar
}

/// Whether `rendered` must be wrapped in parentheses to stand where `site`
/// currently stands
///
/// `site` is the node being replaced; `replacement` supplies the new
/// expression's top-level shape. A binary parent compares operand position
/// against operator associativity; exponentiation additionally rejects a bare
/// unary operand on its left. Any other expression parent wraps when it binds
/// tighter than the replacement. Statement parents, argument lists, and
/// template interpolation slots never require parentheses.
fn needs_parentheses(site: &ScriptSyntaxNode, replacement: &ScriptSyntaxNode) -> bool {
    let parent = match site.parent() {
        Some(parent) => parent,
        None => return false,
    };
    let own = expression_precedence(replacement);

    match parent.kind() {
        ScriptSyntaxKind::BinaryExpr => {
            let op = match BinaryExpr::cast(parent.clone()).and_then(|b| b.operator()) {
                Some(op) => op.kind(),
                None => return false,
            };
            let op_prec = operator_precedence(op);
            let is_left_operand = parent
                .children()
                .find(|n| n.kind().is_expression())
                .is_some_and(|first| &first == site);
            if op == ScriptSyntaxKind::StarStar
                && is_left_operand
                && replacement.kind() == ScriptSyntaxKind::UnaryExpr
            {
                // `-a ** b` is a syntax error; the left operand of `**`
                // must not be a bare unary expression.
                return true;
            }
            let binding_side = is_left_operand != is_right_associative(op);
            let required = if binding_side { op_prec } else { op_prec + 1 };
            own < required
        }
        // Already delimited slots.
        ScriptSyntaxKind::ParenExpr | ScriptSyntaxKind::TemplateExpr => false,
        kind if kind.is_expression() => {
            let parent_prec = expression_precedence(&parent);
            parent_prec > own
        }
        _ => false,
    }
}

/// Render `replacement` so it can replace `site` verbatim, wrapping in
/// parentheses when the surrounding context binds tighter
pub fn parenthesize_if_needed(site: &ScriptSyntaxNode, replacement: &ScriptSyntaxNode) -> String {
    parenthesize_text(site, replacement, replacement.text().to_string())
}

/// Like [`parenthesize_if_needed`], but over already-rendered text
///
/// Used when the replacement text was rewritten (renamed identifiers) and no
/// longer matches the node it was derived from; the node still supplies the
/// top-level precedence, which renaming cannot change.
pub fn parenthesize_text(
    site: &ScriptSyntaxNode,
    replacement: &ScriptSyntaxNode,
    text: String,
) -> String {
    if needs_parentheses(site, replacement) {
        format!("({})", text.trim())
    } else {
        text.trim().to_string()
    }
}

/// Range that removes a statement together with its line
///
/// Extends backward over the statement's own indentation and forward through
/// trailing spaces up to and including the line break, so deletion leaves no
/// blank line behind.
pub fn statement_deletion_range(stmt: &ScriptSyntaxNode) -> TextRange {
    let mut start = stmt.text_range().start();
    let mut end = stmt.text_range().end();

    if let Some(prev) = stmt.first_token().and_then(|t| t.prev_token())
        && prev.kind() == ScriptSyntaxKind::Whitespace
    {
        start = prev.text_range().start();
    }

    let mut next = stmt.last_token().and_then(|t| t.next_token());
    while let Some(token) = next {
        match token.kind() {
            ScriptSyntaxKind::Whitespace => {
                end = token.text_range().end();
                next = token.next_token();
            }
            ScriptSyntaxKind::Newline => {
                end = token.text_range().end();
                break;
            }
            _ => break,
        }
    }

    TextRange::new(start, end)
}

/// The indentation of the line containing `position`
pub fn line_indentation(source: &str, position: TextSize) -> &str {
    let offset = usize::from(position).min(source.len());
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let indent_len = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..indent_len]
}

/// A name derived from `base` for which `is_taken` is false
///
/// Returns `base` itself when free, otherwise `base_1`, `base_2`, ...
pub fn unique_name(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}_{counter}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
