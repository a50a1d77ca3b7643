//! 宣言（関数、型、変数、定数）

use serde::{Deserialize, Serialize};

use super::{Block, Comment, Expr, FieldList, FuncType, Ident, Span};

/// トップレベル宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn doc(&self) -> &[Comment] {
        match self {
            Decl::Gen(decl) => &decl.doc,
            Decl::Func(decl) => &decl.doc,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Decl::Gen(decl) => decl.span,
            Decl::Func(decl) => decl.span,
        }
    }

    pub fn blank_before(&self) -> bool {
        match self {
            Decl::Gen(decl) => decl.blank_before,
            Decl::Func(decl) => decl.blank_before,
        }
    }

    pub fn set_blank_before(&mut self, blank: bool) {
        match self {
            Decl::Gen(decl) => decl.blank_before = blank,
            Decl::Func(decl) => decl.blank_before = blank,
        }
    }

    /// 宣言によって束縛される名前（メソッドは含まない）
    pub fn declared_names(&self) -> Vec<&Ident> {
        match self {
            Decl::Func(func) if func.recv.is_none() => vec![&func.name],
            Decl::Func(_) => Vec::new(),
            Decl::Gen(gen) => gen.specs.iter().flat_map(Spec::names).collect(),
        }
    }
}

/// `const` / `var` / `type` のどれか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenKind {
    Const,
    Var,
    Type,
}

impl GenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenKind::Const => "const",
            GenKind::Var => "var",
            GenKind::Type => "type",
        }
    }
}

/// `const`、`var`、`type` 宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenDecl {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    pub kind: GenKind,
    /// 括弧で囲まれたグループ宣言か
    pub grouped: bool,
    pub specs: Vec<Spec>,
    /// グループの閉じ括弧直前のコメント
    pub trailer: Vec<Comment>,
    /// 閉じ括弧と同じ行のコメント
    pub comment: Option<Comment>,
    pub span: Span,
}

/// 宣言の中身
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn names(&self) -> Vec<&Ident> {
        match self {
            Spec::Value(spec) => spec.names.iter().collect(),
            Spec::Type(spec) => vec![&spec.name],
        }
    }

    pub fn doc(&self) -> &[Comment] {
        match self {
            Spec::Value(spec) => &spec.doc,
            Spec::Type(spec) => &spec.doc,
        }
    }

    pub fn blank_before(&self) -> bool {
        match self {
            Spec::Value(spec) => spec.blank_before,
            Spec::Type(spec) => spec.blank_before,
        }
    }
}

/// `a, b int = 1, 2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<Comment>,
    pub span: Span,
}

/// `Name[T any] Type` または `Name = Type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    /// エイリアス宣言（`=`付き）か
    pub assign: bool,
    pub ty: Expr,
    pub comment: Option<Comment>,
    pub span: Span,
}

/// 関数・メソッド宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub doc: Vec<Comment>,
    pub blank_before: bool,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    pub ty: FuncType,
    pub body: Option<Block>,
    pub comment: Option<Comment>,
    pub span: Span,
}
