//! 型の構文（型も式として扱う）

use serde::{Deserialize, Serialize};

use super::{Comment, Expr, Ident, Span};

/// 構造体フィールド・パラメータ・型パラメータ・インターフェース要素の並び
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldList {
    pub fields: Vec<Field>,
    /// 閉じ括弧直前に残ったコメント
    pub trailer: Vec<Comment>,
    /// 閉じ括弧が最後の要素と別の行にあるか
    pub closing_break: bool,
    pub span: Span,
}

impl FieldList {
    pub fn empty(span: Span) -> Self {
        Self {
            fields: Vec::new(),
            trailer: Vec::new(),
            closing_break: false,
            span,
        }
    }

    pub fn has_comments(&self) -> bool {
        !self.trailer.is_empty()
            || self
                .fields
                .iter()
                .any(|f| !f.doc.is_empty() || f.comment.is_some())
    }
}

/// `a, b int`、`int`、`Name string \`json:"name"\``、`Method() error` など
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    /// 直前の要素と別の行から始まるか
    pub line_break: bool,
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<String>,
    pub comment: Option<Comment>,
    pub span: Span,
}

/// `func(params) results`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncType {
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub span: Span,
}

/// `[N]T`、`[...]T`、`[]T`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    /// スライスなら `None`、`[...]T` なら `Some(Expr::Ellipsis)`
    pub len: Option<Box<Expr>>,
    pub elem: Box<Expr>,
    pub span: Span,
}

/// `map[K]V`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapType {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

/// チャネルの方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// `chan T`、`chan<- T`、`<-chan T`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanType {
    pub dir: ChanDir,
    pub value: Box<Expr>,
    pub span: Span,
}

/// `struct { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    pub fields: FieldList,
    pub span: Span,
}

/// `interface { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceType {
    pub methods: FieldList,
    pub span: Span,
}
