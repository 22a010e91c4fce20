//! Syntax kinds for the script language
//!
//! Every token and node in the CST carries one of these kinds. Values are
//! grouped by category (trivia, keywords, punctuation, literals, structure
//! nodes) with gaps left between groups for future additions.

/// All syntax kinds used by the lexer and parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ScriptSyntaxKind {
    // Trivia (0-9)
    Whitespace = 0,
    CommentLine = 1,
    CommentBlock = 2,
    Newline = 3,

    // Keywords (10-29)
    ConstKw = 10,
    LetKw = 11,
    VarKw = 12,
    FunctionKw = 13,
    ReturnKw = 14,
    ExportKw = 15,

    // Punctuation and operators (100-149)
    LParen = 100,
    RParen = 101,
    LBrace = 102,
    RBrace = 103,
    Comma = 104,
    Semicolon = 105,
    Dot = 106,
    Eq = 107,
    Plus = 108,
    Minus = 109,
    Star = 110,
    Slash = 111,
    Percent = 112,
    StarStar = 113,
    EqEq = 114,
    BangEq = 115,
    Lt = 116,
    Gt = 117,
    LtEq = 118,
    GtEq = 119,
    AmpAmp = 120,
    PipePipe = 121,
    Bang = 122,
    PlusEq = 123,
    MinusEq = 124,
    StarEq = 125,
    SlashEq = 126,

    // Literals & identifiers (150-199)
    Ident = 150,
    NumberLit = 151,
    StringLit = 152,
    TemplateHead = 153,
    TemplateMiddle = 154,
    TemplateTail = 155,
    NoSubTemplate = 156,

    // Structure nodes (200-299)
    Root = 200,
    VarStmt = 210,
    FnDecl = 211,
    ParamList = 212,
    Param = 213,
    Block = 214,
    ReturnStmt = 215,
    ExprStmt = 216,
    NameRef = 230,
    Name = 231,
    Literal = 232,
    BinaryExpr = 233,
    AssignExpr = 234,
    UnaryExpr = 235,
    CallExpr = 236,
    ArgList = 237,
    ParenExpr = 238,
    MemberExpr = 239,
    TemplateExpr = 240,
    TaggedTemplate = 241,

    // Special tokens (400+)
    Error = 400,
    Eof = 401,
    Unknown = 402,
}

impl ScriptSyntaxKind {
    /// Whitespace, comments, and newlines
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            ScriptSyntaxKind::Whitespace
                | ScriptSyntaxKind::CommentLine
                | ScriptSyntaxKind::CommentBlock
                | ScriptSyntaxKind::Newline
        )
    }

    /// Node kinds that appear in expression position
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            ScriptSyntaxKind::NameRef
                | ScriptSyntaxKind::Literal
                | ScriptSyntaxKind::BinaryExpr
                | ScriptSyntaxKind::AssignExpr
                | ScriptSyntaxKind::UnaryExpr
                | ScriptSyntaxKind::CallExpr
                | ScriptSyntaxKind::ParenExpr
                | ScriptSyntaxKind::MemberExpr
                | ScriptSyntaxKind::TemplateExpr
                | ScriptSyntaxKind::TaggedTemplate
        )
    }

    /// Statement node kinds
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            ScriptSyntaxKind::VarStmt
                | ScriptSyntaxKind::FnDecl
                | ScriptSyntaxKind::Block
                | ScriptSyntaxKind::ReturnStmt
                | ScriptSyntaxKind::ExprStmt
        )
    }

    /// Binary operator tokens (assignment operators excluded; those produce
    /// `AssignExpr` nodes and are never part of a concatenation chain)
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            ScriptSyntaxKind::Plus
                | ScriptSyntaxKind::Minus
                | ScriptSyntaxKind::Star
                | ScriptSyntaxKind::Slash
                | ScriptSyntaxKind::Percent
                | ScriptSyntaxKind::StarStar
                | ScriptSyntaxKind::EqEq
                | ScriptSyntaxKind::BangEq
                | ScriptSyntaxKind::Lt
                | ScriptSyntaxKind::Gt
                | ScriptSyntaxKind::LtEq
                | ScriptSyntaxKind::GtEq
                | ScriptSyntaxKind::AmpAmp
                | ScriptSyntaxKind::PipePipe
        )
    }

    /// Assignment operator tokens
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            ScriptSyntaxKind::Eq
                | ScriptSyntaxKind::PlusEq
                | ScriptSyntaxKind::MinusEq
                | ScriptSyntaxKind::StarEq
                | ScriptSyntaxKind::SlashEq
        )
    }

    /// Keyword tokens
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            ScriptSyntaxKind::ConstKw
                | ScriptSyntaxKind::LetKw
                | ScriptSyntaxKind::VarKw
                | ScriptSyntaxKind::FunctionKw
                | ScriptSyntaxKind::ReturnKw
                | ScriptSyntaxKind::ExportKw
        )
    }
}

/// Map an identifier's text to a keyword kind, if it is one
pub fn keyword_kind(text: &str) -> Option<ScriptSyntaxKind> {
    match text {
        "const" => Some(ScriptSyntaxKind::ConstKw),
        "let" => Some(ScriptSyntaxKind::LetKw),
        "var" => Some(ScriptSyntaxKind::VarKw),
        "function" => Some(ScriptSyntaxKind::FunctionKw),
        "return" => Some(ScriptSyntaxKind::ReturnKw),
        "export" => Some(ScriptSyntaxKind::ExportKw),
        _ => None,
    }
}
