//! Inline a local function into its call sites
//!
//! Capture-safe substitution: each call site gets one `const` binding per
//! parameter (preserving argument evaluation order), the body statements are
//! hoisted before the call's statement, and the call expression is replaced
//! by the first return's expression. A parameter whose name is already
//! visible at the call site is bound under a fresh name, and the hoisted body
//! is rewritten to use it, so the inlined code can never capture an unrelated
//! binding of the same spelling.
//!
//! A function with multiple return paths inlines the value of the first
//! return reached in a preorder scan of the body; that is the granularity of
//! this refactor, not full control-flow merging.

use std::collections::HashSet;

use indexmap::IndexMap;
use rowan::TextRange;
use tracing::debug;

use crate::edit::{EditSet, FileEdits};
use crate::semantic::{references_in_scope, Resolver, SymbolId};
use crate::syntax::ast::{
    containing_statement, enclosing_scope, AstNode, Block, CallExpr, ExprStmt, FnDecl, ReturnStmt,
};
use crate::syntax::{ScriptSyntaxKind, ScriptSyntaxNode};
use crate::{RejigError, Result};

use super::rewrite::{
    line_indentation, parenthesize_text, statement_deletion_range, unique_name,
};
use super::{ActionInfo, Refactor, RefactorContext};

const NAME: &str = "inline-function";

pub struct InlineFunction;

struct Candidate {
    declaration: FnDecl,
    body: Block,
    /// Call expressions whose callee is this function, in source order
    usages: Vec<CallExpr>,
    /// The call under the cursor, when there is one
    selected: Option<CallExpr>,
}

fn call_of_reference(reference: &ScriptSyntaxNode) -> Option<CallExpr> {
    let call = CallExpr::cast(reference.parent()?)?;
    (call.callee().as_ref() == Some(reference)).then_some(call)
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
    let declaration = FnDecl::cast(cx.resolver.declaration_of(symbol)?)?;
    let body = declaration.body()?;
    if body.statements().next().is_none() || declaration.is_exported() {
        return None;
    }

    let scope = enclosing_scope(declaration.syntax());
    let references = references_in_scope(&scope, symbol, cx.resolver, false);
    let declaration_range = declaration.syntax().text_range();
    let mut usages: Vec<CallExpr> = Vec::with_capacity(references.len());
    for reference in &references {
        // A recursive call inside the body would be rewritten into the
        // declaration being deleted.
        if declaration_range.contains_range(reference.text_range()) {
            return None;
        }
        match call_of_reference(reference) {
            Some(call) => usages.push(call),
            // A function used as a value cannot be inlined away.
            None => return None,
        }
    }
    // A call site nested in another call site's arguments would need its
    // replacement spliced inside the outer replacement; one pass cannot
    // rewrite both.
    for (index, outer) in usages.iter().enumerate() {
        let outer_range = outer.syntax().text_range();
        if usages[index + 1..]
            .iter()
            .any(|inner| outer_range.contains_range(inner.syntax().text_range()))
        {
            return None;
        }
    }

    let selected = (node.kind() == ScriptSyntaxKind::NameRef)
        .then(|| call_of_reference(&node))
        .flatten();
    Some(Candidate {
        declaration,
        body,
        usages,
        selected,
    })
}

/// First return statement reached in a preorder scan of the body, ignoring
/// nested function declarations
fn first_return(body: &Block) -> Option<ReturnStmt> {
    body.syntax()
        .descendants()
        .filter(|n| n.kind() == ScriptSyntaxKind::ReturnStmt)
        .find(|n| {
            n.ancestors()
                .skip(1)
                .take_while(|a| a != body.syntax())
                .all(|a| a.kind() != ScriptSyntaxKind::FnDecl)
        })
        .and_then(ReturnStmt::cast)
}

/// Render a subtree with renamed parameter references spliced in
fn text_with_renames(
    node: &ScriptSyntaxNode,
    renames: &IndexMap<SymbolId, String>,
    resolver: &dyn Resolver,
) -> String {
    let text = node.text().to_string();
    if renames.is_empty() {
        return text;
    }
    let base = node.text_range().start();
    let mut replacements: Vec<(TextRange, &str)> = node
        .descendants()
        .filter(|n| n.kind() == ScriptSyntaxKind::NameRef)
        .filter_map(|n| {
            let id = resolver.symbol_of(&n)?;
            renames.get(&id).map(|name| (n.text_range(), name.as_str()))
        })
        .collect();
    replacements.sort_by_key(|(range, _)| range.start());

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for (range, name) in replacements {
        let start = usize::from(range.start() - base);
        let end = usize::from(range.end() - base);
        out.push_str(&text[cursor..start]);
        out.push_str(name);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Inline one call site
///
/// `taken` accumulates every binding name chosen so far across the whole
/// request, so successive call sites in one scope never redeclare a name.
fn inline_call(
    cx: &RefactorContext,
    edits: &mut EditSet,
    candidate: &Candidate,
    call: &CallExpr,
    taken: &mut HashSet<String>,
) -> Result<()> {
    let stmt = containing_statement(call.syntax()).ok_or_else(|| {
        RejigError::internal("call expression without a containing statement")
    })?;
    let insert_at = statement_deletion_range(&stmt).start();
    let indent = line_indentation(cx.source, stmt.text_range().start());

    let visible: HashSet<String> = cx
        .resolver
        .visible_symbols(call.syntax())
        .into_iter()
        .map(|s| s.name)
        .collect();

    // One binding per parameter, preserving argument evaluation order.
    let arguments = call.arguments();
    let mut renames: IndexMap<SymbolId, String> = IndexMap::new();
    for (index, param) in candidate.declaration.params().iter().enumerate() {
        let Some(name_node) = param.name_node() else {
            continue;
        };
        let original = name_node.text();
        let chosen = unique_name(&original, |n| visible.contains(n) || taken.contains(n));
        if chosen != original {
            debug!(original, chosen, "renaming parameter to avoid capture");
            if let Some(id) = cx.resolver.symbol_of(name_node.syntax()) {
                renames.insert(id, chosen.clone());
            }
        }
        taken.insert(chosen.clone());

        let value = arguments
            .get(index)
            .map(|arg| arg.text().to_string())
            .unwrap_or_else(|| "undefined".to_string());
        edits.insert_before(insert_at, format!("{indent}const {chosen} = {value};\n"));
    }

    // Hoist the body, minus return statements.
    for body_stmt in candidate.body.statements() {
        if body_stmt.kind() == ScriptSyntaxKind::ReturnStmt {
            continue;
        }
        let text = text_with_renames(&body_stmt, &renames, cx.resolver);
        edits.insert_before(insert_at, format!("{indent}{}\n", text.trim()));
    }

    let returned = first_return(&candidate.body).and_then(|r| r.expression());
    match returned {
        Some(expr) => {
            let text = text_with_renames(&expr, &renames, cx.resolver);
            edits.replace_node(call.syntax(), parenthesize_text(call.syntax(), &expr, text));
        }
        None => {
            // The call's value is unused; drop the whole statement.
            let value_unused = ExprStmt::cast(stmt.clone())
                .and_then(|s| s.expression())
                .is_some_and(|e| &e == call.syntax());
            if value_unused {
                edits.delete(statement_deletion_range(&stmt));
            } else {
                edits.replace_node(call.syntax(), "undefined");
            }
        }
    }
    Ok(())
}

impl Refactor for InlineFunction {
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
            .ok_or_else(|| RejigError::internal("inline-function applied at inapplicable position"))?;
        let mut edits = EditSet::new();
        let mut taken = HashSet::new();

        match action {
            "inline-all" => {
                for call in &candidate.usages {
                    inline_call(cx, &mut edits, &candidate, call, &mut taken)?;
                }
                edits.delete(statement_deletion_range(candidate.declaration.syntax()));
            }
            "inline-here" => {
                let call = candidate
                    .selected
                    .clone()
                    .ok_or_else(|| RejigError::invalid_action(NAME, action))?;
                inline_call(cx, &mut edits, &candidate, &call, &mut taken)?;
                if candidate.usages.len() == 1 {
                    edits.delete(statement_deletion_range(candidate.declaration.syntax()));
                }
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
        let edits = InlineFunction.edits_for_action(&cx, action)?;
        edits.edits.render(source)
    }

    fn actions(source: &str, cursor: &str) -> Vec<&'static str> {
        let root = parse(source).root;
        let resolver = LexicalResolver::analyze(&root);
        let offset = TextSize::from(source.find(cursor).unwrap() as u32);
        let cx = RefactorContext::new(root.clone(), source, offset, &resolver);
        InlineFunction
            .available_actions(&cx)
            .into_iter()
            .map(|a| a.id)
            .collect()
    }

    #[test]
    fn single_call_with_return_value() {
        let source = "function double(n) { return n * 2; }\nconst y = double(3);\n";
        let result = apply(source, "double(3", "inline-here").unwrap();
        assert_eq!(result, "const n = 3;\nconst y = n * 2;\n");
    }

    #[test]
    fn colliding_parameter_gets_a_fresh_name() {
        let source = "function f(x) { return x + 1; }\n{\n    const x = 5;\n    f(x * 2);\n}\n";
        let result = apply(source, "f(x * 2", "inline-here").unwrap();
        assert_eq!(result, "{\n    const x = 5;\n    const x_1 = x * 2;\n    x_1 + 1;\n}\n");
    }

    #[test]
    fn body_statements_hoist_before_the_call() {
        let source = "function g(a) { log(a); return a * 2; }\nconst y = g(3) + 1;\n";
        let result = apply(source, "g(3", "inline-all").unwrap();
        assert_eq!(result, "const a = 3;\nlog(a);\nconst y = a * 2 + 1;\n");
    }

    #[test]
    fn returned_expression_is_reparenthesized() {
        let source = "function h() { return a + b; }\nconst y = h() * 2;\n";
        let result = apply(source, "h()", "inline-all").unwrap();
        assert_eq!(result, "const y = (a + b) * 2;\n");
    }

    #[test]
    fn missing_arguments_bind_undefined() {
        let source = "function f(a, b) { return a + b; }\nconst y = f(1);\n";
        let result = apply(source, "f(1", "inline-all").unwrap();
        assert_eq!(result, "const a = 1;\nconst b = undefined;\nconst y = a + b;\n");
    }

    #[test]
    fn call_without_return_is_removed() {
        let source = "function f(a) { log(a); }\nf(7);\nafter();\n";
        let result = apply(source, "f(7", "inline-all").unwrap();
        assert_eq!(result, "const a = 7;\nlog(a);\nafter();\n");
    }

    #[test]
    fn inline_here_keeps_declaration_with_remaining_calls() {
        let source = "function f() { return 1; }\nconst a = f();\nconst b = f();\n";
        let result = apply(source, "f();\nconst b", "inline-here").unwrap();
        assert_eq!(result, "function f() { return 1; }\nconst a = 1;\nconst b = f();\n");
    }

    #[test]
    fn repeated_call_sites_never_redeclare_a_binding() {
        let source = "function f(a) { return a; }\nuse(f(1));\nuse(f(2));\n";
        let result = apply(source, "f(1", "inline-all").unwrap();
        assert_eq!(
            result,
            "const a = 1;\nuse(a);\nconst a_1 = 2;\nuse(a_1);\n"
        );
    }

    #[test]
    fn zero_usages_allows_inline_all_only() {
        let source = "function f() { return 1; }\nother();\n";
        assert_eq!(actions(source, "f()"), vec!["inline-all"]);
        let result = apply(source, "f()", "inline-all").unwrap();
        assert_eq!(result, "other();\n");
    }

    #[test]
    fn empty_body_is_not_applicable() {
        assert!(actions("function f() {}\nf();\n", "f()").is_empty());
    }

    #[test]
    fn exported_function_is_not_applicable() {
        assert!(actions("export function f() { return 1; }\nf();\n", "f()").is_empty());
    }

    #[test]
    fn function_used_as_value_is_not_applicable() {
        assert!(actions("function f() { return 1; }\ng(f);\n", "f()").is_empty());
    }

    #[test]
    fn nested_call_sites_are_not_applicable() {
        let source = "function f(a) { return a + 1; }\nuse(f(f(1)));\n";
        assert!(actions(source, "f(f(1").is_empty());
        assert!(actions(source, "f(1)").is_empty());
    }

    #[test]
    fn recursive_function_is_not_applicable() {
        let source = "function f(n) { return f(n - 1); }\nconst y = f(3);\n";
        assert!(actions(source, "f(3").is_empty());
        assert!(actions(source, "f(n - 1").is_empty());
    }

    #[test]
    fn first_return_wins_with_multiple_returns() {
        let source =
            "function pick(c) { return c; return 0; }\nconst y = pick(9);\n";
        let result = apply(source, "pick(9", "inline-all").unwrap();
        assert_eq!(result, "const c = 9;\nconst y = c;\n");
    }
}
