//! 文の定義

use serde::{Deserialize, Serialize};

use super::{Comment, Expr, GenDecl, Ident, Span};

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 開き括弧と同じ行のコメント
    pub opening_comment: Option<Comment>,
    pub items: Vec<BlockItem>,
    /// 閉じ括弧直前に残ったコメント
    pub trailer: Vec<Comment>,
    /// 開き括弧と閉じ括弧が同じ行にあったか
    pub one_line: bool,
    pub span: Span,
}

impl Block {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.trailer.is_empty() && self.opening_comment.is_none()
    }
}

/// ブロック内の1文とそれに付いたコメント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockItem {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    pub stmt: Stmt,
    pub comment: Option<Comment>,
}

/// 文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Decl(GenDecl),
    Empty(Span),
    Labeled(LabeledStmt),
    Expr(Expr),
    Send(SendStmt),
    IncDec(IncDecStmt),
    Assign(AssignStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Return(ReturnStmt),
    Branch(BranchStmt),
    Block(Block),
    If(IfStmt),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    Select(SelectStmt),
    For(ForStmt),
    Range(RangeStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Decl(s) => s.span,
            Stmt::Empty(span) => *span,
            Stmt::Labeled(s) => s.span,
            Stmt::Expr(e) => e.span(),
            Stmt::Send(s) => s.span,
            Stmt::IncDec(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Go(s) => s.span,
            Stmt::Defer(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Branch(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::TypeSwitch(s) => s.span,
            Stmt::Select(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Range(s) => s.span,
        }
    }

    /// 入れ子のブロックを持つ複合文か
    pub fn is_compound(&self) -> bool {
        match self {
            Stmt::Block(_)
            | Stmt::If(_)
            | Stmt::Switch(_)
            | Stmt::TypeSwitch(_)
            | Stmt::Select(_)
            | Stmt::For(_)
            | Stmt::Range(_) => true,
            Stmt::Labeled(labeled) => labeled.stmt.is_compound(),
            _ => false,
        }
    }
}

/// `Label: stmt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStmt {
    pub label: Ident,
    pub stmt: Box<Stmt>,
    pub span: Span,
}

/// `ch <- v`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendStmt {
    pub chan: Expr,
    pub value: Expr,
    pub span: Span,
}

/// `x++` / `x--`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncDecStmt {
    pub x: Expr,
    pub inc: bool,
    pub span: Span,
}

/// 代入演算子（`:=` を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub op: AssignOp,
    pub rhs: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoStmt {
    pub call: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferStmt {
    pub call: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
    pub span: Span,
}

/// `break`、`continue`、`goto`、`fallthrough`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchStmt {
    pub kind: BranchKind,
    pub label: Option<Ident>,
    pub span: Span,
}

/// `if init; cond { ... } else ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then: Block,
    /// `Stmt::If` または `Stmt::Block`
    pub els: Option<Box<Stmt>>,
    pub span: Span,
}

/// `case` / `default` 節
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    /// `default` なら `None`
    pub list: Option<Vec<Expr>>,
    pub body: Vec<BlockItem>,
    pub comment: Option<Comment>,
    pub span: Span,
}

/// `switch init; tag { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub clauses: Vec<CaseClause>,
    pub trailer: Vec<Comment>,
    pub span: Span,
}

/// `switch init; v := x.(type) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// `v := x.(type)`（`Stmt::Assign`）または `x.(type)`（`Stmt::Expr`）
    pub guard: Box<Stmt>,
    pub clauses: Vec<CaseClause>,
    pub trailer: Vec<Comment>,
    pub span: Span,
}

/// `select` の節
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClause {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    /// `default` なら `None`
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<BlockItem>,
    pub comment: Option<Comment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStmt {
    pub clauses: Vec<CommClause>,
    pub trailer: Vec<Comment>,
    pub span: Span,
}

/// `for init; cond; post { ... }`（条件のみ・無限ループも含む）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
    pub span: Span,
}

/// `for k, v := range x { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    /// `:=` なら `Define`、`=` なら `Assign`（キーが無い場合は無視）
    pub op: AssignOp,
    pub x: Expr,
    pub body: Block,
    pub span: Span,
}
