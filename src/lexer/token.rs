//! トークン定義

use logos::Logos;
use std::fmt;

/// Goソースのトークン型
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\f]+")] // 空白文字をスキップ（改行以外）
pub enum Token {
    // キーワード
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // 識別子（キーワードの後に来る必要がある）
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", |lex| lex.slice().to_owned(), priority = 1)]
    Identifier(String),

    // 数値リテラル（整数・浮動小数点・虚数）。元の綴りのまま保持する
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i?", |lex| lex.slice().to_owned())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?", |lex| lex.slice().to_owned())]
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?([pP][+-]?[0-9_]+)?i?", |lex| lex.slice().to_owned())]
    #[regex(r"0[bBoO][0-9_]+i?", |lex| lex.slice().to_owned())]
    Number(String),

    // ルーンリテラル
    #[regex(r"'([^'\\\n]|\\[^\n])+'", |lex| lex.slice().to_owned())]
    Rune(String),

    // 文字列リテラル（解釈済み文字列・生文字列）
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, |lex| lex.slice().to_owned())]
    #[regex(r"`[^`]*`", |lex| lex.slice().to_owned())]
    String(String),

    // コメント（スキップせずにパーサーへ渡す）
    #[regex(r"//[^\n]*", |lex| lex.slice().to_owned())]
    #[token("/*", block_comment)]
    Comment(String),

    // 演算子
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpersandAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
    #[token("==")]
    EqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    Define,
    #[token("...")]
    Ellipsis,

    // 区切り文字
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    // 改行（セミコロン自動挿入の判定にのみ使う）
    #[token("\n")]
    Newline,
}

/// ブロックコメントを最初の `*/` まで読み進める（Goのブロックコメントは入れ子にならない）。
/// 閉じられていなければ `None` を返してエラーにする
fn block_comment(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let end = lex.remainder().find("*/")?;
    lex.bump(end + 2);
    Some(lex.slice().to_owned())
}

impl Token {
    /// 行末でセミコロンを自動挿入する対象のトークンか
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_)
                | Token::Number(_)
                | Token::Rune(_)
                | Token::String(_)
                | Token::Break
                | Token::Continue
                | Token::Fallthrough
                | Token::Return
                | Token::Increment
                | Token::Decrement
                | Token::RightParen
                | Token::RightBracket
                | Token::RightBrace
        )
    }

    /// ソース上の綴り
    pub fn as_str(&self) -> &str {
        match self {
            Token::Break => "break",
            Token::Case => "case",
            Token::Chan => "chan",
            Token::Const => "const",
            Token::Continue => "continue",
            Token::Default => "default",
            Token::Defer => "defer",
            Token::Else => "else",
            Token::Fallthrough => "fallthrough",
            Token::For => "for",
            Token::Func => "func",
            Token::Go => "go",
            Token::Goto => "goto",
            Token::If => "if",
            Token::Import => "import",
            Token::Interface => "interface",
            Token::Map => "map",
            Token::Package => "package",
            Token::Range => "range",
            Token::Return => "return",
            Token::Select => "select",
            Token::Struct => "struct",
            Token::Switch => "switch",
            Token::Type => "type",
            Token::Var => "var",
            Token::Identifier(s)
            | Token::Number(s)
            | Token::Rune(s)
            | Token::String(s)
            | Token::Comment(s) => s,
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::AndNot => "&^",
            Token::PlusAssign => "+=",
            Token::MinusAssign => "-=",
            Token::StarAssign => "*=",
            Token::SlashAssign => "/=",
            Token::PercentAssign => "%=",
            Token::AmpersandAssign => "&=",
            Token::PipeAssign => "|=",
            Token::CaretAssign => "^=",
            Token::ShlAssign => "<<=",
            Token::ShrAssign => ">>=",
            Token::AndNotAssign => "&^=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Arrow => "<-",
            Token::Increment => "++",
            Token::Decrement => "--",
            Token::EqEq => "==",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Assign => "=",
            Token::Bang => "!",
            Token::Tilde => "~",
            Token::NotEq => "!=",
            Token::LtEq => "<=",
            Token::GtEq => ">=",
            Token::Define => ":=",
            Token::Ellipsis => "...",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::Newline => "newline",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "識別子 {}", s),
            Token::Number(s) | Token::Rune(s) | Token::String(s) => write!(f, "リテラル {}", s),
            Token::Comment(_) => write!(f, "コメント"),
            _ => write!(f, "'{}'", self.as_str()),
        }
    }
}
