//! Trivia-preserving lexer for the script language
//!
//! Designed for CST construction: whitespace, comments, and newlines are
//! emitted as tokens rather than skipped, so the parsed tree reproduces the
//! source byte-for-byte.
//!
//! Template literals lex as composite tokens. A template with interpolations
//! produces `TemplateHead` (`` `text${ ``), ordinary tokens for the embedded
//! expression, then `TemplateMiddle` (`}text${`) or `TemplateTail`
//! (`` }text` ``). A template without interpolations is one `NoSubTemplate`
//! token. The lexer tracks brace depth per open template so a `}` that closes
//! an interpolation is distinguished from a block-closing `}`.

use std::ops::Range;

use super::ScriptSyntaxKind;

/// Byte range in the source
pub type TokenSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: TokenSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: TokenSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: ScriptSyntaxKind,
    pub text: String,
    pub span: TokenSpan,
}

impl Token {
    pub fn new(kind: ScriptSyntaxKind, text: impl Into<String>, span: TokenSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the lexer
pub type LexResult = (Vec<Token>, Vec<LexerError>);

/// Lex input preserving all trivia
///
/// Lossless: concatenating the `text` of every token reproduces `input`.
pub fn lex(input: &str) -> LexResult {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    errors: Vec<LexerError>,
    // One entry per open template; the value is the brace nesting depth
    // inside the current interpolation.
    template_stack: Vec<u32>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
            template_stack: Vec::new(),
        }
    }

    fn run(mut self) -> LexResult {
        while self.pos < self.input.len() {
            self.next_token();
        }
        (self.tokens, self.errors)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn emit(&mut self, kind: ScriptSyntaxKind, start: usize, end: usize) {
        self.tokens
            .push(Token::new(kind, &self.input[start..end], start..end));
        self.pos = end;
    }

    fn next_token(&mut self) {
        let start = self.pos;
        let ch = match self.peek() {
            Some(c) => c,
            None => return,
        };

        match ch {
            '\n' => self.emit(ScriptSyntaxKind::Newline, start, start + 1),
            '\r' => {
                let end = if self.peek_at(1) == Some('\n') {
                    start + 2
                } else {
                    start + 1
                };
                self.emit(ScriptSyntaxKind::Newline, start, end);
            }
            c if c.is_whitespace() => {
                let mut end = start;
                for c in self.input[start..].chars() {
                    if c.is_whitespace() && c != '\n' && c != '\r' {
                        end += c.len_utf8();
                    } else {
                        break;
                    }
                }
                self.emit(ScriptSyntaxKind::Whitespace, start, end);
            }
            '/' if self.peek_at(1) == Some('/') => {
                let end = self.input[start..]
                    .find('\n')
                    .map_or(self.input.len(), |i| start + i);
                self.emit(ScriptSyntaxKind::CommentLine, start, end);
            }
            '/' if self.peek_at(1) == Some('*') => {
                let end = match self.input[start + 2..].find("*/") {
                    Some(i) => start + 2 + i + 2,
                    None => {
                        self.errors
                            .push(LexerError::new("unterminated block comment", start..self.input.len()));
                        self.input.len()
                    }
                };
                self.emit(ScriptSyntaxKind::CommentBlock, start, end);
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut end = start;
                for c in self.input[start..].chars() {
                    if c.is_alphanumeric() || c == '_' || c == '$' {
                        end += c.len_utf8();
                    } else {
                        break;
                    }
                }
                let kind = super::keyword_kind(&self.input[start..end])
                    .unwrap_or(ScriptSyntaxKind::Ident);
                self.emit(kind, start, end);
            }
            c if c.is_ascii_digit() => {
                let mut end = start;
                let mut seen_dot = false;
                for c in self.input[start..].chars() {
                    if c.is_ascii_digit() {
                        end += 1;
                    } else if c == '.' && !seen_dot {
                        seen_dot = true;
                        end += 1;
                    } else {
                        break;
                    }
                }
                self.emit(ScriptSyntaxKind::NumberLit, start, end);
            }
            '"' | '\'' => self.lex_string(start, ch),
            '`' => self.lex_template_start(start),
            '{' => {
                if let Some(depth) = self.template_stack.last_mut() {
                    *depth += 1;
                }
                self.emit(ScriptSyntaxKind::LBrace, start, start + 1);
            }
            '}' => {
                match self.template_stack.last_mut() {
                    Some(0) => self.lex_template_continue(start),
                    Some(depth) => {
                        *depth -= 1;
                        self.emit(ScriptSyntaxKind::RBrace, start, start + 1);
                    }
                    None => self.emit(ScriptSyntaxKind::RBrace, start, start + 1),
                }
            }
            _ => self.lex_operator(start),
        }
    }

    fn lex_string(&mut self, start: usize, quote: char) {
        let mut chars = self.input[start..].char_indices().skip(1).peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '\n' => {
                    self.errors
                        .push(LexerError::new("unterminated string literal", start..start + i));
                    self.emit(ScriptSyntaxKind::StringLit, start, start + i);
                    return;
                }
                c if c == quote => {
                    self.emit(ScriptSyntaxKind::StringLit, start, start + i + 1);
                    return;
                }
                _ => {}
            }
        }
        self.errors
            .push(LexerError::new("unterminated string literal", start..self.input.len()));
        self.emit(ScriptSyntaxKind::StringLit, start, self.input.len());
    }

    /// Scan from an opening backtick to `${` (head) or a closing backtick
    /// (no-substitution template).
    fn lex_template_start(&mut self, start: usize) {
        match self.scan_template_text(start + 1) {
            TemplateScan::Interpolation(end) => {
                self.template_stack.push(0);
                self.emit(ScriptSyntaxKind::TemplateHead, start, end);
            }
            TemplateScan::Close(end) => {
                self.emit(ScriptSyntaxKind::NoSubTemplate, start, end);
            }
            TemplateScan::Unterminated => {
                self.errors
                    .push(LexerError::new("unterminated template literal", start..self.input.len()));
                self.emit(ScriptSyntaxKind::NoSubTemplate, start, self.input.len());
            }
        }
    }

    /// Scan from the `}` that closes an interpolation to the next `${`
    /// (middle) or closing backtick (tail).
    fn lex_template_continue(&mut self, start: usize) {
        match self.scan_template_text(start + 1) {
            TemplateScan::Interpolation(end) => {
                self.emit(ScriptSyntaxKind::TemplateMiddle, start, end);
            }
            TemplateScan::Close(end) => {
                self.template_stack.pop();
                self.emit(ScriptSyntaxKind::TemplateTail, start, end);
            }
            TemplateScan::Unterminated => {
                self.template_stack.pop();
                self.errors
                    .push(LexerError::new("unterminated template literal", start..self.input.len()));
                self.emit(ScriptSyntaxKind::TemplateTail, start, self.input.len());
            }
        }
    }

    fn scan_template_text(&self, from: usize) -> TemplateScan {
        let bytes = self.input.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'`' => return TemplateScan::Close(i + 1),
                b'$' if bytes.get(i + 1) == Some(&b'{') => {
                    return TemplateScan::Interpolation(i + 2);
                }
                _ => i += 1,
            }
        }
        TemplateScan::Unterminated
    }

    fn lex_operator(&mut self, start: usize) {
        use ScriptSyntaxKind::*;
        let rest = &self.input[start..];

        let two = |s: &str| rest.starts_with(s);
        let (kind, len) = if two("**") {
            (StarStar, 2)
        } else if two("==") {
            (EqEq, 2)
        } else if two("!=") {
            (BangEq, 2)
        } else if two("<=") {
            (LtEq, 2)
        } else if two(">=") {
            (GtEq, 2)
        } else if two("&&") {
            (AmpAmp, 2)
        } else if two("||") {
            (PipePipe, 2)
        } else if two("+=") {
            (PlusEq, 2)
        } else if two("-=") {
            (MinusEq, 2)
        } else if two("*=") {
            (StarEq, 2)
        } else if two("/=") {
            (SlashEq, 2)
        } else {
            let ch = rest.chars().next().unwrap_or('\0');
            let kind = match ch {
                '(' => LParen,
                ')' => RParen,
                ',' => Comma,
                ';' => Semicolon,
                '.' => Dot,
                '=' => Eq,
                '+' => Plus,
                '-' => Minus,
                '*' => Star,
                '/' => Slash,
                '%' => Percent,
                '<' => Lt,
                '>' => Gt,
                '!' => Bang,
                _ => {
                    self.errors.push(LexerError::new(
                        format!("unexpected character '{ch}'"),
                        start..start + ch.len_utf8(),
                    ));
                    Error
                }
            };
            (kind, ch.len_utf8())
        };
        self.emit(kind, start, start + len);
    }
}

enum TemplateScan {
    /// Text ran into `${`; value is the offset just past it
    Interpolation(usize),
    /// Text ran into a closing backtick; value is the offset just past it
    Close(usize),
    Unterminated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScriptSyntaxKind::*;

    fn kinds(source: &str) -> Vec<ScriptSyntaxKind> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected lexer errors: {errors:?}");
        tokens
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lossless() {
        let source = "const x = 1 + 2; // done\nfunction f(a) { return a; }\n";
        let (tokens, _) = lex(source);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn keywords_and_operators() {
        assert_eq!(
            kinds("const x = a ** b != c;"),
            vec![ConstKw, Ident, Eq, Ident, StarStar, Ident, BangEq, Ident, Semicolon]
        );
    }

    #[test]
    fn string_literals() {
        assert_eq!(kinds(r#""a\"b" 'c'"#), vec![StringLit, StringLit]);
    }

    #[test]
    fn plain_template_is_single_token() {
        assert_eq!(kinds("`just text`"), vec![NoSubTemplate]);
    }

    #[test]
    fn template_with_interpolations() {
        assert_eq!(
            kinds("`a${x}b${y}c`"),
            vec![TemplateHead, Ident, TemplateMiddle, Ident, TemplateTail]
        );
    }

    #[test]
    fn template_with_nested_braces() {
        // The object-ish braces inside the interpolation must not close it.
        assert_eq!(
            kinds("`a${ f({}) }b`"),
            vec![TemplateHead, Ident, LParen, LBrace, RBrace, RParen, TemplateTail]
        );
    }

    #[test]
    fn escaped_backtick_stays_in_template() {
        assert_eq!(kinds(r"`a\`b`"), vec![NoSubTemplate]);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (_, errors) = lex("\"abc");
        assert_eq!(errors.len(), 1);
    }
}
