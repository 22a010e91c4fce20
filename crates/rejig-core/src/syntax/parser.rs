//! Recursive-descent parser for the script language
//!
//! Builds a hierarchical, lossless CST from the lexed token stream. Trivia
//! is consumed into the innermost node that is open when it is reached, with
//! one rule that keeps ranges useful for rewriting: trivia is flushed to the
//! enclosing node *before* a new node starts, so every node's range is tight
//! around its own tokens.
//!
//! Identifiers in expression position are wrapped in `NameRef` nodes and
//! declaration-site identifiers in `Name` nodes; the semantic layer and the
//! refactors key off those wrappers.

use super::lexer::{LexerError, Token, lex};
use super::{ScriptSyntaxKind, ScriptSyntaxNode, TreeBuilder};

/// A parse error with its byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: std::ops::Range<usize>,
}

impl ParseError {
    fn new(message: impl Into<String>, span: std::ops::Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self {
            message: err.message,
            span: err.span,
        }
    }
}

/// Result of parsing one source buffer
#[derive(Debug, Clone)]
pub struct Parse {
    pub root: ScriptSyntaxNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse source text into a lossless CST
///
/// The tree reproduces the input exactly: `parse(src).root.text() == src`.
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = lex(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_root();
    let (root, mut errors) = parser.finish();
    errors.splice(0..0, lex_errors.into_iter().map(ParseError::from));
    Parse { root, errors }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    builder: TreeBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: TreeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (ScriptSyntaxNode, Vec<ParseError>) {
        (self.builder.finish(), self.errors)
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    /// Kind of the next non-trivia token, without consuming anything
    fn current(&self) -> Option<ScriptSyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
    }

    /// Kind of the nth (0-based) upcoming non-trivia token
    fn nth(&self, n: usize) -> Option<ScriptSyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
    }

    fn at_end(&self) -> bool {
        self.current().is_none()
    }

    /// Flush pending trivia into the currently open node
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    /// Consume the next non-trivia token (plus the trivia before it) into the
    /// currently open node
    fn bump(&mut self) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: ScriptSyntaxKind) {
        if self.current() == Some(kind) {
            self.bump();
        } else {
            let span = self
                .tokens
                .get(self.pos)
                .map_or(0..0, |t| t.span.clone());
            self.errors
                .push(ParseError::new(format!("expected {kind:?}"), span));
        }
    }

    /// Consume an optional trailing semicolon
    fn eat_semicolon(&mut self) {
        if self.current() == Some(ScriptSyntaxKind::Semicolon) {
            self.bump();
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_root(&mut self) {
        self.builder.start_node(ScriptSyntaxKind::Root);
        while !self.at_end() {
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                // Unknown token; consume it as an error so we make progress.
                self.error_and_bump("unexpected token");
            }
        }
        self.eat_trivia();
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        use ScriptSyntaxKind::*;
        match self.current() {
            Some(ExportKw) => {
                if self.nth(1) == Some(FunctionKw) {
                    self.parse_fn_decl();
                } else {
                    self.parse_var_stmt();
                }
            }
            Some(ConstKw | LetKw | VarKw) => self.parse_var_stmt(),
            Some(FunctionKw) => self.parse_fn_decl(),
            Some(ReturnKw) => self.parse_return_stmt(),
            Some(LBrace) => self.parse_block(),
            Some(_) => self.parse_expr_stmt(),
            None => {}
        }
    }

    fn parse_var_stmt(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::VarStmt);
        if self.current() == Some(ScriptSyntaxKind::ExportKw) {
            self.bump();
        }
        // const | let | var
        self.bump();
        self.parse_name();
        if self.current() == Some(ScriptSyntaxKind::Eq) {
            self.bump();
            self.parse_expr();
        }
        self.eat_semicolon();
        self.builder.finish_node();
    }

    fn parse_fn_decl(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::FnDecl);
        if self.current() == Some(ScriptSyntaxKind::ExportKw) {
            self.bump();
        }
        self.expect(ScriptSyntaxKind::FunctionKw);
        self.parse_name();
        self.parse_param_list();
        if self.current() == Some(ScriptSyntaxKind::LBrace) {
            self.parse_block();
        } else {
            let span = self.tokens.get(self.pos).map_or(0..0, |t| t.span.clone());
            self.errors
                .push(ParseError::new("expected function body", span));
        }
        self.builder.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::ParamList);
        self.expect(ScriptSyntaxKind::LParen);
        while !matches!(
            self.current(),
            Some(ScriptSyntaxKind::RParen) | None
        ) {
            self.eat_trivia();
            self.builder.start_node(ScriptSyntaxKind::Param);
            self.parse_name();
            self.builder.finish_node();
            if self.current() == Some(ScriptSyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(ScriptSyntaxKind::RParen);
        self.builder.finish_node();
    }

    fn parse_block(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::Block);
        self.expect(ScriptSyntaxKind::LBrace);
        while !matches!(
            self.current(),
            Some(ScriptSyntaxKind::RBrace) | None
        ) {
            let before = self.pos;
            self.parse_statement();
            if self.pos == before {
                self.error_and_bump("unexpected token in block");
            }
        }
        self.expect(ScriptSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    fn parse_return_stmt(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::ReturnStmt);
        self.expect(ScriptSyntaxKind::ReturnKw);
        if !matches!(
            self.current(),
            Some(ScriptSyntaxKind::Semicolon | ScriptSyntaxKind::RBrace) | None
        ) {
            self.parse_expr();
        }
        self.eat_semicolon();
        self.builder.finish_node();
    }

    fn parse_expr_stmt(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::ExprStmt);
        self.parse_expr();
        self.eat_semicolon();
        self.builder.finish_node();
    }

    /// Declaration-site identifier, wrapped in a `Name` node
    fn parse_name(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::Name);
        self.expect(ScriptSyntaxKind::Ident);
        self.builder.finish_node();
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expr(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_binary(1);
        if self
            .current()
            .is_some_and(ScriptSyntaxKind::is_assignment_operator)
        {
            self.builder
                .start_node_at(checkpoint, ScriptSyntaxKind::AssignExpr);
            self.bump();
            // Right-associative
            self.parse_expr();
            self.builder.finish_node();
        }
    }

    fn parse_binary(&mut self, min_prec: u8) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_unary();
        loop {
            let Some((prec, right_assoc)) = self.current().and_then(binary_precedence) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.builder
                .start_node_at(checkpoint, ScriptSyntaxKind::BinaryExpr);
            self.bump();
            self.parse_binary(if right_assoc { prec } else { prec + 1 });
            self.builder.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        if matches!(
            self.current(),
            Some(ScriptSyntaxKind::Minus | ScriptSyntaxKind::Bang)
        ) {
            self.eat_trivia();
            self.builder.start_node(ScriptSyntaxKind::UnaryExpr);
            self.bump();
            self.parse_unary();
            self.builder.finish_node();
        } else {
            self.parse_postfix();
        }
    }

    fn parse_postfix(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_primary();
        loop {
            match self.current() {
                Some(ScriptSyntaxKind::LParen) => {
                    self.builder
                        .start_node_at(checkpoint, ScriptSyntaxKind::CallExpr);
                    self.parse_arg_list();
                    self.builder.finish_node();
                }
                Some(ScriptSyntaxKind::Dot) => {
                    self.builder
                        .start_node_at(checkpoint, ScriptSyntaxKind::MemberExpr);
                    self.bump();
                    self.expect(ScriptSyntaxKind::Ident);
                    self.builder.finish_node();
                }
                Some(ScriptSyntaxKind::NoSubTemplate | ScriptSyntaxKind::TemplateHead) => {
                    self.builder
                        .start_node_at(checkpoint, ScriptSyntaxKind::TaggedTemplate);
                    self.parse_template();
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_arg_list(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::ArgList);
        self.expect(ScriptSyntaxKind::LParen);
        while !matches!(
            self.current(),
            Some(ScriptSyntaxKind::RParen) | None
        ) {
            self.parse_expr();
            if self.current() == Some(ScriptSyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(ScriptSyntaxKind::RParen);
        self.builder.finish_node();
    }

    fn parse_primary(&mut self) {
        use ScriptSyntaxKind::*;
        match self.current() {
            Some(Ident) => {
                self.eat_trivia();
                self.builder.start_node(NameRef);
                self.bump();
                self.builder.finish_node();
            }
            Some(NumberLit | StringLit) => {
                self.eat_trivia();
                self.builder.start_node(Literal);
                self.bump();
                self.builder.finish_node();
            }
            Some(NoSubTemplate | TemplateHead) => self.parse_template(),
            Some(LParen) => {
                self.eat_trivia();
                self.builder.start_node(ParenExpr);
                self.bump();
                self.parse_expr();
                self.expect(RParen);
                self.builder.finish_node();
            }
            _ => self.error_and_bump("expected expression"),
        }
    }

    fn parse_template(&mut self) {
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::TemplateExpr);
        match self.current() {
            Some(ScriptSyntaxKind::NoSubTemplate) => self.bump(),
            Some(ScriptSyntaxKind::TemplateHead) => {
                self.bump();
                loop {
                    self.parse_expr();
                    match self.current() {
                        Some(ScriptSyntaxKind::TemplateMiddle) => self.bump(),
                        Some(ScriptSyntaxKind::TemplateTail) => {
                            self.bump();
                            break;
                        }
                        _ => {
                            let span =
                                self.tokens.get(self.pos).map_or(0..0, |t| t.span.clone());
                            self.errors
                                .push(ParseError::new("unterminated template", span));
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
        self.builder.finish_node();
    }

    fn error_and_bump(&mut self, message: &str) {
        let span = self.tokens.get(self.pos).map_or(0..0, |t| t.span.clone());
        self.errors.push(ParseError::new(message, span));
        self.eat_trivia();
        self.builder.start_node(ScriptSyntaxKind::Error);
        if self.pos < self.tokens.len() {
            self.bump();
        }
        self.builder.finish_node();
    }
}

/// Precedence and associativity for binary operator tokens
///
/// Higher binds tighter. Assignment is handled separately (`AssignExpr`).
fn binary_precedence(kind: ScriptSyntaxKind) -> Option<(u8, bool)> {
    use ScriptSyntaxKind::*;
    let entry = match kind {
        PipePipe => (1, false),
        AmpAmp => (2, false),
        EqEq | BangEq => (3, false),
        Lt | Gt | LtEq | GtEq => (4, false),
        Plus | Minus => (5, false),
        Star | Slash | Percent => (6, false),
        StarStar => (7, true),
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScriptSyntaxKind::*;

    fn parse_ok(source: &str) -> ScriptSyntaxNode {
        let parse = parse(source);
        assert!(parse.ok(), "parse errors for {source:?}: {:?}", parse.errors);
        parse.root
    }

    /// First descendant of the given kind
    fn find(root: &ScriptSyntaxNode, kind: ScriptSyntaxKind) -> ScriptSyntaxNode {
        root.descendants()
            .find(|n| n.kind() == kind)
            .unwrap_or_else(|| panic!("no {kind:?} in tree"))
    }

    #[test]
    fn lossless_roundtrip() {
        let source = "// greet\nexport const msg = `hi ${name}`;\nfunction f(a, b) {\n    return a + b;\n}\nf(1, 2);\n";
        let root = parse_ok(source);
        assert_eq!(root.text().to_string(), source);
    }

    #[test]
    fn var_stmt_structure() {
        let root = parse_ok("const x = 1 + 2;");
        let stmt = find(&root, VarStmt);
        assert_eq!(find(&stmt, Name).text().to_string(), "x");
        assert_eq!(find(&stmt, BinaryExpr).text().to_string(), "1 + 2");
    }

    #[test]
    fn additive_is_left_associative() {
        let root = parse_ok("a + b + c;");
        let outer = find(&root, BinaryExpr);
        // Outer node spans the whole chain; its first child is the inner chain.
        assert_eq!(outer.text().to_string(), "a + b + c");
        let inner = outer.children().next().unwrap();
        assert_eq!(inner.kind(), BinaryExpr);
        assert_eq!(inner.text().to_string(), "a + b");
    }

    #[test]
    fn exponent_is_right_associative() {
        let root = parse_ok("a ** b ** c;");
        let outer = find(&root, BinaryExpr);
        assert_eq!(outer.text().to_string(), "a ** b ** c");
        let rhs = outer.children().nth(1).unwrap();
        assert_eq!(rhs.text().to_string(), "b ** c");
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let root = parse_ok("a + b * c;");
        let outer = find(&root, BinaryExpr);
        assert_eq!(outer.text().to_string(), "a + b * c");
        let rhs = outer.children().nth(1).unwrap();
        assert_eq!(rhs.text().to_string(), "b * c");
    }

    #[test]
    fn assignment_is_its_own_node() {
        let root = parse_ok("x = y + 1;");
        let assign = find(&root, AssignExpr);
        assert_eq!(assign.text().to_string(), "x = y + 1");
        assert!(root.descendants().any(|n| n.kind() == BinaryExpr));
    }

    #[test]
    fn call_with_arguments() {
        let root = parse_ok("f(a, b + 1);");
        let call = find(&root, CallExpr);
        assert_eq!(call.text().to_string(), "f(a, b + 1)");
        let args: Vec<_> = find(&call, ArgList)
            .children()
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(args, vec!["a", "b + 1"]);
    }

    #[test]
    fn template_expression_structure() {
        let root = parse_ok("const s = `a${x}b${y}c`;");
        let template = find(&root, TemplateExpr);
        let exprs: Vec<_> = template.children().map(|n| n.text().to_string()).collect();
        assert_eq!(exprs, vec!["x", "y"]);
    }

    #[test]
    fn tagged_template() {
        let root = parse_ok("tag`a${x}b`;");
        let tagged = find(&root, TaggedTemplate);
        assert_eq!(tagged.text().to_string(), "tag`a${x}b`");
    }

    #[test]
    fn node_ranges_are_tight() {
        let source = "const x =  1 + 2 ;";
        let root = parse_ok(source);
        let binary = find(&root, BinaryExpr);
        let range = binary.text_range();
        assert_eq!(&source[range.start().into()..range.end().into()], "1 + 2");
    }

    #[test]
    fn function_declaration() {
        let root = parse_ok("export function add(a, b) { return a + b; }");
        let decl = find(&root, FnDecl);
        assert_eq!(find(&decl, Name).text().to_string(), "add");
        let params: Vec<_> = find(&decl, ParamList)
            .children()
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(params, vec!["a", "b"]);
        assert!(decl.children().any(|n| n.kind() == Block));
    }

    #[test]
    fn recovers_from_garbage() {
        let parse = parse("const x = ; @");
        assert!(!parse.ok());
        // Still lossless even with errors.
        assert_eq!(parse.root.text().to_string(), "const x = ; @");
    }
}
