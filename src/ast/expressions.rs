//! Expression definitions (type expressions included).

use serde::{Deserialize, Serialize};

use super::{
    ArrayType, Block, ChanType, Comment, FuncType, Ident, InterfaceType, MapType, Span,
    StructType,
};

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(CompositeLit),
    FuncLit(FuncLit),
    Paren(ParenExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    TypeAssert(TypeAssertExpr),
    Call(CallExpr),
    Star(StarExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    /// `...T` in a variadic parameter, or the length of `[...]T`
    Ellipsis(EllipsisExpr),
    ArrayType(ArrayType),
    MapType(MapType),
    ChanType(ChanType),
    FuncType(FuncType),
    StructType(StructType),
    InterfaceType(InterfaceType),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(e) => e.span,
            Expr::BasicLit(e) => e.span,
            Expr::CompositeLit(e) => e.span,
            Expr::FuncLit(e) => e.span,
            Expr::Paren(e) => e.span,
            Expr::Selector(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::Slice(e) => e.span,
            Expr::TypeAssert(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Star(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Ellipsis(e) => e.span,
            Expr::ArrayType(e) => e.span,
            Expr::MapType(e) => e.span,
            Expr::ChanType(e) => e.span,
            Expr::FuncType(e) => e.span,
            Expr::StructType(e) => e.span,
            Expr::InterfaceType(e) => e.span,
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// A type name usable as the type of a composite literal (`T`, `pkg.T`, `T[int]`)
    pub fn is_type_name(&self) -> bool {
        match self {
            Expr::Ident(_) => true,
            Expr::Selector(sel) => matches!(*sel.x, Expr::Ident(_)),
            Expr::Index(index) => index.x.is_type_name(),
            _ => false,
        }
    }

    /// A type literal that may directly precede a composite literal body
    pub fn is_literal_type(&self) -> bool {
        matches!(
            self,
            Expr::ArrayType(_) | Expr::MapType(_) | Expr::StructType(_)
        )
    }
}

/// Kind of a basic literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

/// Literal kept in its original spelling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
    pub span: Span,
}

/// `T{...}`, or `{...}` with the type elided inside another literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeLit {
    pub ty: Option<Box<Expr>>,
    pub elements: Vec<Element>,
    pub trailer: Vec<Comment>,
    pub closing_break: bool,
    pub span: Span,
}

/// One composite literal element, `value` or `key: value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    pub line_break: bool,
    pub key: Option<Expr>,
    pub value: Expr,
    pub comment: Option<Comment>,
    pub span: Span,
}

/// Function literal (closure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenExpr {
    pub x: Box<Expr>,
    pub span: Span,
}

/// `x.Sel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
    pub span: Span,
}

/// `x[i]` or a generic instantiation `F[int, string]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub indices: Vec<Expr>,
    pub span: Span,
}

/// `x[lo:hi]` or `x[lo:hi:max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    pub slice3: bool,
    pub span: Span,
}

/// `x.(T)`; `ty` is `None` for the `x.(type)` guard of a type switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub ty: Option<Box<Expr>>,
    pub span: Span,
}

/// Function call or conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    /// For each argument, whether it starts on a new source line
    pub arg_breaks: Vec<bool>,
    /// `f(xs...)`
    pub ellipsis: bool,
    pub closing_break: bool,
    pub span: Span,
}

/// `*x`, pointer dereference or pointer type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarExpr {
    pub x: Box<Expr>,
    pub span: Span,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    Xor,
    Addr,
    Recv,
    Tilde,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
            UnaryOp::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub x: Box<Expr>,
    pub span: Span,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    LogOr,
    LogAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    /// Go operator precedence, 1 (lowest) to 5 (highest)
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::LogOr => 1,
            BinaryOp::LogAnd => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::LogOr => "||",
            BinaryOp::LogAnd => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::AndNot => "&^",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op: BinaryOp,
    pub y: Box<Expr>,
    /// The right operand starts on a new line after the operator
    pub line_break: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipsisExpr {
    pub elem: Option<Box<Expr>>,
    pub span: Span,
}
