//! Rowan language implementation for the script language
//!
//! Connects `ScriptSyntaxKind` to Rowan's generic CST infrastructure.

use rowan::Language;

use super::ScriptSyntaxKind;

/// Language implementation for the script language
///
/// Zero-sized type implementing `rowan::Language` to bridge our syntax kinds
/// and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptLanguage;

impl Language for ScriptLanguage {
    type Kind = ScriptSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => ScriptSyntaxKind::Whitespace,
            1 => ScriptSyntaxKind::CommentLine,
            2 => ScriptSyntaxKind::CommentBlock,
            3 => ScriptSyntaxKind::Newline,

            // Keywords
            10 => ScriptSyntaxKind::ConstKw,
            11 => ScriptSyntaxKind::LetKw,
            12 => ScriptSyntaxKind::VarKw,
            13 => ScriptSyntaxKind::FunctionKw,
            14 => ScriptSyntaxKind::ReturnKw,
            15 => ScriptSyntaxKind::ExportKw,

            // Punctuation and operators
            100 => ScriptSyntaxKind::LParen,
            101 => ScriptSyntaxKind::RParen,
            102 => ScriptSyntaxKind::LBrace,
            103 => ScriptSyntaxKind::RBrace,
            104 => ScriptSyntaxKind::Comma,
            105 => ScriptSyntaxKind::Semicolon,
            106 => ScriptSyntaxKind::Dot,
            107 => ScriptSyntaxKind::Eq,
            108 => ScriptSyntaxKind::Plus,
            109 => ScriptSyntaxKind::Minus,
            110 => ScriptSyntaxKind::Star,
            111 => ScriptSyntaxKind::Slash,
            112 => ScriptSyntaxKind::Percent,
            113 => ScriptSyntaxKind::StarStar,
            114 => ScriptSyntaxKind::EqEq,
            115 => ScriptSyntaxKind::BangEq,
            116 => ScriptSyntaxKind::Lt,
            117 => ScriptSyntaxKind::Gt,
            118 => ScriptSyntaxKind::LtEq,
            119 => ScriptSyntaxKind::GtEq,
            120 => ScriptSyntaxKind::AmpAmp,
            121 => ScriptSyntaxKind::PipePipe,
            122 => ScriptSyntaxKind::Bang,
            123 => ScriptSyntaxKind::PlusEq,
            124 => ScriptSyntaxKind::MinusEq,
            125 => ScriptSyntaxKind::StarEq,
            126 => ScriptSyntaxKind::SlashEq,

            // Literals & identifiers
            150 => ScriptSyntaxKind::Ident,
            151 => ScriptSyntaxKind::NumberLit,
            152 => ScriptSyntaxKind::StringLit,
            153 => ScriptSyntaxKind::TemplateHead,
            154 => ScriptSyntaxKind::TemplateMiddle,
            155 => ScriptSyntaxKind::TemplateTail,
            156 => ScriptSyntaxKind::NoSubTemplate,

            // Structure nodes
            200 => ScriptSyntaxKind::Root,
            210 => ScriptSyntaxKind::VarStmt,
            211 => ScriptSyntaxKind::FnDecl,
            212 => ScriptSyntaxKind::ParamList,
            213 => ScriptSyntaxKind::Param,
            214 => ScriptSyntaxKind::Block,
            215 => ScriptSyntaxKind::ReturnStmt,
            216 => ScriptSyntaxKind::ExprStmt,
            230 => ScriptSyntaxKind::NameRef,
            231 => ScriptSyntaxKind::Name,
            232 => ScriptSyntaxKind::Literal,
            233 => ScriptSyntaxKind::BinaryExpr,
            234 => ScriptSyntaxKind::AssignExpr,
            235 => ScriptSyntaxKind::UnaryExpr,
            236 => ScriptSyntaxKind::CallExpr,
            237 => ScriptSyntaxKind::ArgList,
            238 => ScriptSyntaxKind::ParenExpr,
            239 => ScriptSyntaxKind::MemberExpr,
            240 => ScriptSyntaxKind::TemplateExpr,
            241 => ScriptSyntaxKind::TaggedTemplate,

            // Special tokens
            400 => ScriptSyntaxKind::Error,
            401 => ScriptSyntaxKind::Eof,
            _ => ScriptSyntaxKind::Unknown,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Red-tree node over `ScriptLanguage`
pub type ScriptSyntaxNode = rowan::SyntaxNode<ScriptLanguage>;
/// Red-tree token over `ScriptLanguage`
pub type ScriptSyntaxToken = rowan::SyntaxToken<ScriptLanguage>;
/// Node-or-token element
pub type ScriptSyntaxElement = rowan::SyntaxElement<ScriptLanguage>;
