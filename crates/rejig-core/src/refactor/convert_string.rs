//! Convert between string concatenation and template literals
//!
//! "To template" flattens a chain of `+` binary expressions into an ordered
//! operand list, merges consecutive string literals into one text segment,
//! and emits a template with the remaining operands as interpolation slots. A
//! sub-expression with no string literal in it stays a single opaque slot, so
//! arithmetic like `1 + 2 + "a"` keeps its grouping as `${1 + 2}a`.
//!
//! "To concatenation" walks the template's text tokens and interpolations in
//! order and folds them back into a `+` chain. Round-trips are semantically
//! equivalent, not byte-identical: escape and merge choices differ between
//! the two surface forms.

use tracing::debug;

use crate::edit::{EditSet, FileEdits};
use crate::syntax::ast::{AstNode, BinaryExpr, Literal, ParenExpr, TemplateExpr};
use crate::syntax::{ScriptSyntaxKind, ScriptSyntaxNode};
use crate::{RejigError, Result};

use super::rewrite::{expression_precedence, operator_precedence};
use super::{ActionInfo, Refactor, RefactorContext};

const NAME: &str = "convert-string";

pub struct ConvertString;

/// Flattened concatenation chain
struct Chain {
    operands: Vec<ScriptSyntaxNode>,
    contains_string: bool,
    operators_valid: bool,
}

fn is_string_leaf(node: &ScriptSyntaxNode) -> bool {
    match node.kind() {
        ScriptSyntaxKind::Literal => Literal::cast(node.clone()).is_some_and(|l| l.is_string()),
        ScriptSyntaxKind::TemplateExpr => {
            TemplateExpr::cast(node.clone()).is_some_and(|t| t.is_plain())
        }
        _ => false,
    }
}

fn subtree_contains_string(node: &ScriptSyntaxNode) -> bool {
    node.descendants().any(|n| is_string_leaf(&n))
}

fn flatten_into(node: &ScriptSyntaxNode, chain: &mut Chain) {
    if let Some(paren) = ParenExpr::cast(node.clone()) {
        // String concatenation is associative; grouping parens around a
        // string-bearing sub-chain carry no meaning worth preserving.
        if let Some(inner) = paren.inner() {
            flatten_into(&inner, chain);
        }
        return;
    }
    if let Some(binary) = BinaryExpr::cast(node.clone()) {
        if !subtree_contains_string(node) {
            // Stringless arithmetic stays one opaque interpolation slot.
            chain.operands.push(node.clone());
            return;
        }
        if let (Some(lhs), Some(op), Some(rhs)) = (binary.lhs(), binary.operator(), binary.rhs())
        {
            flatten_into(&lhs, chain);
            if op.kind() != ScriptSyntaxKind::Plus {
                chain.operators_valid = false;
            }
            flatten_into(&rhs, chain);
            return;
        }
    }
    if is_string_leaf(node) {
        chain.contains_string = true;
    }
    chain.operands.push(node.clone());
}

fn flatten(node: &ScriptSyntaxNode) -> Chain {
    let mut chain = Chain {
        operands: Vec::new(),
        contains_string: false,
        operators_valid: true,
    };
    flatten_into(node, &mut chain);
    chain
}

/// Widest node the conversion replaces: absorb wrapping parentheses, then
/// climb the `+` spine, repeating until neither applies
fn concat_root(node: ScriptSyntaxNode) -> ScriptSyntaxNode {
    let mut top = node;
    loop {
        if let Some(parent) = top.parent() {
            if parent.kind() == ScriptSyntaxKind::ParenExpr
                || parent.kind() == ScriptSyntaxKind::BinaryExpr
            {
                top = parent;
                continue;
            }
        }
        return top;
    }
}

/// Decode a string literal's raw text into plain characters
///
/// Strips the quotes, decodes octal escapes, and drops the backslash from
/// quote escapes; every other escape sequence is kept verbatim since it means
/// the same thing inside a template.
fn decode_string_literal(raw: &str) -> String {
    let inner = if raw.len() >= 2
        && (raw.starts_with('"') && raw.ends_with('"')
            || raw.starts_with('\'') && raw.ends_with('\''))
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&d @ '0'..='7') => {
                chars.next();
                let mut value = d as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&d @ '0'..='7') if value * 8 + (d as u32 - '0' as u32) <= 0xFF => {
                            value = value * 8 + (d as u32 - '0' as u32);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if let Some(decoded) = char::from_u32(value) {
                    out.push(decoded);
                }
            }
            Some(&q @ ('"' | '\'')) => {
                chars.next();
                out.push(q);
            }
            Some(&other) => {
                chars.next();
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Escape plain text for use inside a template literal
fn escape_template_text(text: &str) -> String {
    text.replace('`', "\\`").replace("${", "\\${")
}

fn interpolation_text(node: &ScriptSyntaxNode) -> String {
    let mut node = node.clone();
    while let Some(paren) = ParenExpr::cast(node.clone()) {
        match paren.inner() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node.text().to_string().trim().to_string()
}

/// The merged template text a string run contributes
fn string_leaf_text(node: &ScriptSyntaxNode) -> Option<String> {
    if !is_string_leaf(node) {
        return None;
    }
    match node.kind() {
        ScriptSyntaxKind::Literal => {
            let token = Literal::cast(node.clone())?.token()?;
            Some(escape_template_text(&decode_string_literal(token.text())))
        }
        // Plain template content is already template-escaped.
        ScriptSyntaxKind::TemplateExpr => {
            let token = node
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .find(|t| t.kind() == ScriptSyntaxKind::NoSubTemplate)?;
            let raw = token.text();
            Some(raw[1..raw.len().saturating_sub(1).max(1)].to_string())
        }
        _ => None,
    }
}

/// Build the template literal text for a flattened operand list
fn nodes_to_template(operands: &[ScriptSyntaxNode]) -> String {
    let mut out = String::from("`");
    let mut buffer = String::new();
    for operand in operands {
        match string_leaf_text(operand) {
            Some(text) => buffer.push_str(&text),
            None => {
                out.push_str(&buffer);
                buffer.clear();
                out.push_str("${");
                out.push_str(&interpolation_text(operand));
                out.push('}');
            }
        }
    }
    out.push_str(&buffer);
    out.push('`');
    out
}

/// Escape template text content for use inside a double-quoted string literal
fn escape_string_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                // Template-only escapes lose their backslash.
                Some('`') => {
                    chars.next();
                    out.push('`');
                }
                Some('$') => {
                    chars.next();
                    out.push('$');
                }
                Some(&other) => {
                    chars.next();
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Text content of one template text token, delimiters stripped
fn template_token_content(kind: ScriptSyntaxKind, raw: &str) -> &str {
    let (skip_start, skip_end) = match kind {
        // `text${
        ScriptSyntaxKind::TemplateHead => (1, 2),
        // }text${
        ScriptSyntaxKind::TemplateMiddle => (1, 2),
        // }text`
        ScriptSyntaxKind::TemplateTail => (1, 1),
        // `text`
        ScriptSyntaxKind::NoSubTemplate => (1, 1),
        _ => (0, 0),
    };
    if raw.len() >= skip_start + skip_end {
        &raw[skip_start..raw.len() - skip_end]
    } else {
        ""
    }
}

/// Build the concatenation text for a template
fn template_to_concat(template: &TemplateExpr) -> String {
    if template.is_plain() {
        let content = template
            .text_tokens()
            .first()
            .map(|t| template_token_content(t.kind(), t.text()).to_string())
            .unwrap_or_default();
        return format!("\"{}\"", escape_string_text(&content));
    }

    let mut parts: Vec<String> = Vec::new();
    let mut string_seen = false;
    let mut leading_interpolations = 0usize;
    for element in template.syntax().children_with_tokens() {
        match element {
            rowan::NodeOrToken::Token(token)
                if matches!(
                    token.kind(),
                    ScriptSyntaxKind::TemplateHead
                        | ScriptSyntaxKind::TemplateMiddle
                        | ScriptSyntaxKind::TemplateTail
                        | ScriptSyntaxKind::NoSubTemplate
                ) =>
            {
                let content = template_token_content(token.kind(), token.text());
                if !content.is_empty() {
                    parts.push(format!("\"{}\"", escape_string_text(content)));
                    string_seen = true;
                }
            }
            rowan::NodeOrToken::Node(node) if node.kind().is_expression() => {
                if !string_seen {
                    leading_interpolations += 1;
                }
                let text = node.text().to_string();
                // Anything binding looser than `+` must keep its grouping
                // once it sits inside a left-associative `+` chain.
                if expression_precedence(&node) <= operator_precedence(ScriptSyntaxKind::Plus) {
                    parts.push(format!("({text})"));
                } else {
                    parts.push(text);
                }
            }
            _ => {}
        }
    }
    // The template stringifies every interpolation; the chain only does so
    // once a string operand has entered the fold. A leading "" supplies the
    // coercion when the template's own text segments cannot.
    if !string_seen || leading_interpolations >= 2 {
        parts.insert(0, "\"\"".to_string());
    }
    parts.join(" + ")
}

/// The concatenation chain the cursor sits in, when conversion to a template
/// is valid there
fn template_target(cx: &RefactorContext) -> Option<ScriptSyntaxNode> {
    let node = cx.node()?;
    if !node.kind().is_expression() {
        return None;
    }
    let top = concat_root(node);
    // An existing template alone is not a concatenation to convert.
    if top.kind() == ScriptSyntaxKind::TemplateExpr {
        return None;
    }
    let chain = flatten(&top);
    if chain.contains_string && chain.operators_valid {
        Some(top)
    } else {
        debug!(
            contains_string = chain.contains_string,
            operators_valid = chain.operators_valid,
            "chain not convertible to template"
        );
        None
    }
}

/// The template the cursor sits in, when conversion to concatenation is valid
fn concat_target(cx: &RefactorContext) -> Option<TemplateExpr> {
    let node = cx.node()?;
    let template = node.ancestors().find_map(TemplateExpr::cast)?;
    let tagged = template
        .syntax()
        .parent()
        .is_some_and(|p| p.kind() == ScriptSyntaxKind::TaggedTemplate);
    (!tagged).then_some(template)
}

impl Refactor for ConvertString {
    fn name(&self) -> &'static str {
        NAME
    }

    fn available_actions(&self, cx: &RefactorContext) -> Vec<ActionInfo> {
        let mut actions = Vec::new();
        if template_target(cx).is_some() {
            actions.push(ActionInfo::new(NAME, "to-template"));
        }
        if concat_target(cx).is_some() {
            actions.push(ActionInfo::new(NAME, "to-concatenation"));
        }
        actions
    }

    fn edits_for_action(&self, cx: &RefactorContext, action: &str) -> Result<FileEdits> {
        let mut edits = EditSet::new();
        match action {
            "to-template" => {
                let target = template_target(cx).ok_or_else(|| {
                    RejigError::internal("to-template applied at inapplicable position")
                })?;
                let chain = flatten(&target);
                edits.replace_node(&target, nodes_to_template(&chain.operands));
            }
            "to-concatenation" => {
                let template = concat_target(cx).ok_or_else(|| {
                    RejigError::internal("to-concatenation applied at inapplicable position")
                })?;
                edits.replace_node(template.syntax(), template_to_concat(&template));
            }
            other => return Err(RejigError::invalid_action(NAME, other)),
        }
        Ok(cx.file_edits(edits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::LexicalResolver;
    use crate::syntax::parse;
    use rowan::TextSize;

    fn apply(source: &str, cursor: &str, action: &str) -> Result<String> {
        let root = parse(source).root;
        let resolver = LexicalResolver::analyze(&root);
        let offset = TextSize::from(source.find(cursor).unwrap() as u32);
        let cx = RefactorContext::new(root.clone(), source, offset, &resolver);
        let edits = ConvertString.edits_for_action(&cx, action)?;
        edits.edits.render(source)
    }

    fn actions(source: &str, cursor: &str) -> Vec<&'static str> {
        let root = parse(source).root;
        let resolver = LexicalResolver::analyze(&root);
        let offset = TextSize::from(source.find(cursor).unwrap() as u32);
        let cx = RefactorContext::new(root.clone(), source, offset, &resolver);
        ConvertString
            .available_actions(&cx)
            .into_iter()
            .map(|a| a.id)
            .collect()
    }

    #[test]
    fn literal_runs_merge_into_template_segments() {
        let source = "const s = \"Mr \" + name + \" is \" + age + \" years old\";\n";
        let result = apply(source, "Mr", "to-template").unwrap();
        assert_eq!(result, "const s = `Mr ${name} is ${age} years old`;\n");
    }

    #[test]
    fn concat_availability_matrix() {
        assert_eq!(actions("const s = \"a\" + b + \"c\";\n", "\"a\""), vec!["to-template"]);
        assert_eq!(actions("const s = `a${b}c`;\n", "a$"), vec!["to-concatenation"]);
    }

    #[test]
    fn non_additive_operator_disables_to_template() {
        assert!(actions("const s = \"a\" + b - c;\n", "\"a\"").is_empty());
    }

    #[test]
    fn chain_without_string_disables_to_template() {
        assert!(actions("const s = a + b;\n", "a +").is_empty());
    }

    #[test]
    fn stringless_subtree_stays_one_slot() {
        let source = "const s = 1 + 2 + \"a\";\n";
        let result = apply(source, "\"a\"", "to-template").unwrap();
        assert_eq!(result, "const s = `${1 + 2}a`;\n");
    }

    #[test]
    fn octal_escapes_are_decoded() {
        let source = "const s = \"\\101\" + x;\n";
        let result = apply(source, "\\101", "to-template").unwrap();
        assert_eq!(result, "const s = `A${x}`;\n");
    }

    #[test]
    fn backticks_and_interpolation_starts_are_escaped() {
        let source = "const s = \"a`b\" + x + \"${\" + y;\n";
        let result = apply(source, "a`b", "to-template").unwrap();
        assert_eq!(result, "const s = `a\\`b${x}\\${${y}`;\n");
    }

    #[test]
    fn grouping_parens_are_absorbed() {
        let source = "const s = (\"a\" + b) + c;\n";
        let result = apply(source, "\"a\"", "to-template").unwrap();
        assert_eq!(result, "const s = `a${b}${c}`;\n");
    }

    #[test]
    fn single_string_literal_becomes_plain_template() {
        let source = "const s = \"hello\";\n";
        let result = apply(source, "hello", "to-template").unwrap();
        assert_eq!(result, "const s = `hello`;\n");
    }

    #[test]
    fn template_with_interpolations_becomes_chain() {
        let source = "const s = `Mr ${name} is ${age}`;\n";
        let result = apply(source, "Mr", "to-concatenation").unwrap();
        assert_eq!(result, "const s = \"Mr \" + name + \" is \" + age;\n");
    }

    #[test]
    fn plain_template_becomes_string_literal() {
        let source = "const s = `hello`;\n";
        let result = apply(source, "hello", "to-concatenation").unwrap();
        assert_eq!(result, "const s = \"hello\";\n");
    }

    #[test]
    fn additive_interpolation_keeps_its_grouping() {
        let source = "const s = `x${a + b}y`;\n";
        let result = apply(source, "x$", "to-concatenation").unwrap();
        assert_eq!(result, "const s = \"x\" + (a + b) + \"y\";\n");
    }

    #[test]
    fn interpolation_only_template_keeps_string_coercion() {
        let source = "const s = `${a}`;\n";
        let result = apply(source, "${a", "to-concatenation").unwrap();
        assert_eq!(result, "const s = \"\" + a;\n");
    }

    #[test]
    fn adjacent_leading_interpolations_coerce_before_combining() {
        let source = "const s = `${a}${b}c`;\n";
        let result = apply(source, "${a", "to-concatenation").unwrap();
        assert_eq!(result, "const s = \"\" + a + b + \"c\";\n");
    }

    #[test]
    fn tagged_template_is_not_convertible() {
        assert!(actions("tag`a${b}c`;\n", "a$").is_empty());
    }

    #[test]
    fn template_quote_content_is_escaped_for_strings() {
        let source = "const s = `say \"hi\"`;\n";
        let result = apply(source, "say", "to-concatenation").unwrap();
        assert_eq!(result, "const s = \"say \\\"hi\\\"\";\n");
    }
}
