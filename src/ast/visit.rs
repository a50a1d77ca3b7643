//! Mutable traversal of the syntax tree.
//!
//! Every identifier occurrence is reported together with the syntactic position it
//! occupies, so passes can decide what to touch without resolving scopes.

use super::*;

/// Syntactic position of an identifier occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentRole {
    /// Name bound by a declaration (top-level or local)
    Declaration,
    /// Unqualified use of a name
    Reference,
    /// Right-hand side of `x.Name`
    Selector,
    /// Bare identifier key in a composite literal
    LiteralKey,
    /// Struct field or interface method name
    FieldName,
    /// Name of a method declaration
    MethodName,
    Label,
    PackageName,
    /// Local binding of an import
    ImportName,
}

impl IdentRole {
    /// Whether a top-level rename may apply to this occurrence
    pub fn is_renamable(&self) -> bool {
        matches!(self, IdentRole::Declaration | IdentRole::Reference)
    }
}

/// Where a field list appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldContext {
    /// Parameters, results, receivers and type parameters
    Params,
    Struct,
    Interface,
}

pub trait VisitorMut {
    fn visit_ident(&mut self, _ident: &mut Ident, _role: IdentRole) {}

    /// A run of leading comments, a header or a trailer
    fn visit_comment_group(&mut self, _group: &mut Vec<Comment>) {}

    /// A comment trailing a node on the same line
    fn visit_line_comment(&mut self, _comment: &mut Option<Comment>) {}

    fn visit_file(&mut self, file: &mut File) {
        walk_file(self, file);
    }

    fn visit_decl(&mut self, decl: &mut Decl) {
        walk_decl(self, decl);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_file<V: VisitorMut + ?Sized>(v: &mut V, file: &mut File) {
    v.visit_comment_group(&mut file.header);
    v.visit_comment_group(&mut file.doc);
    v.visit_ident(&mut file.package.name, IdentRole::PackageName);
    for import in &mut file.imports {
        walk_import_decl(v, import);
    }
    for decl in &mut file.decls {
        v.visit_decl(decl);
    }
    v.visit_comment_group(&mut file.trailing);
}

pub fn walk_import_decl<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut ImportDecl) {
    v.visit_comment_group(&mut decl.doc);
    for spec in &mut decl.specs {
        v.visit_comment_group(&mut spec.doc);
        if let Some(name) = &mut spec.name {
            v.visit_ident(name, IdentRole::ImportName);
        }
        v.visit_line_comment(&mut spec.comment);
    }
    v.visit_comment_group(&mut decl.trailer);
}

pub fn walk_decl<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut Decl) {
    match decl {
        Decl::Gen(gen) => walk_gen_decl(v, gen),
        Decl::Func(func) => walk_func_decl(v, func),
    }
}

pub fn walk_gen_decl<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut GenDecl) {
    v.visit_comment_group(&mut decl.doc);
    for spec in &mut decl.specs {
        match spec {
            Spec::Value(spec) => {
                v.visit_comment_group(&mut spec.doc);
                for name in &mut spec.names {
                    v.visit_ident(name, IdentRole::Declaration);
                }
                if let Some(ty) = &mut spec.ty {
                    v.visit_expr(ty);
                }
                for value in &mut spec.values {
                    v.visit_expr(value);
                }
                v.visit_line_comment(&mut spec.comment);
            }
            Spec::Type(spec) => {
                v.visit_comment_group(&mut spec.doc);
                v.visit_ident(&mut spec.name, IdentRole::Declaration);
                if let Some(params) = &mut spec.type_params {
                    walk_field_list(v, params, FieldContext::Params);
                }
                v.visit_expr(&mut spec.ty);
                v.visit_line_comment(&mut spec.comment);
            }
        }
    }
    v.visit_comment_group(&mut decl.trailer);
    v.visit_line_comment(&mut decl.comment);
}

pub fn walk_func_decl<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut FuncDecl) {
    v.visit_comment_group(&mut decl.doc);
    let role = match &mut decl.recv {
        Some(recv) => {
            walk_field_list(v, recv, FieldContext::Params);
            IdentRole::MethodName
        }
        None => IdentRole::Declaration,
    };
    v.visit_ident(&mut decl.name, role);
    if let Some(params) = &mut decl.type_params {
        walk_field_list(v, params, FieldContext::Params);
    }
    walk_func_type(v, &mut decl.ty);
    if let Some(body) = &mut decl.body {
        walk_block(v, body);
    }
    v.visit_line_comment(&mut decl.comment);
}

pub fn walk_func_type<V: VisitorMut + ?Sized>(v: &mut V, ty: &mut FuncType) {
    walk_field_list(v, &mut ty.params, FieldContext::Params);
    if let Some(results) = &mut ty.results {
        walk_field_list(v, results, FieldContext::Params);
    }
}

pub fn walk_field_list<V: VisitorMut + ?Sized>(v: &mut V, list: &mut FieldList, ctx: FieldContext) {
    let role = match ctx {
        FieldContext::Params => IdentRole::Declaration,
        FieldContext::Struct | FieldContext::Interface => IdentRole::FieldName,
    };
    for field in &mut list.fields {
        v.visit_comment_group(&mut field.doc);
        for name in &mut field.names {
            v.visit_ident(name, role);
        }
        // インターフェースのメソッドは名前と関数型の組
        match (&mut field.ty, ctx, field.names.is_empty()) {
            (Expr::FuncType(func), FieldContext::Interface, false) => walk_func_type(v, func),
            (ty, _, _) => v.visit_expr(ty),
        }
        v.visit_line_comment(&mut field.comment);
    }
    v.visit_comment_group(&mut list.trailer);
}

pub fn walk_block<V: VisitorMut + ?Sized>(v: &mut V, block: &mut Block) {
    v.visit_line_comment(&mut block.opening_comment);
    walk_items(v, &mut block.items);
    v.visit_comment_group(&mut block.trailer);
}

fn walk_items<V: VisitorMut + ?Sized>(v: &mut V, items: &mut [BlockItem]) {
    for item in items {
        v.visit_comment_group(&mut item.doc);
        v.visit_stmt(&mut item.stmt);
        v.visit_line_comment(&mut item.comment);
    }
}

fn walk_opt_stmt<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Option<Box<Stmt>>) {
    if let Some(stmt) = stmt {
        v.visit_stmt(stmt);
    }
}

fn walk_case_clauses<V: VisitorMut + ?Sized>(v: &mut V, clauses: &mut [CaseClause]) {
    for clause in clauses {
        v.visit_comment_group(&mut clause.doc);
        if let Some(list) = &mut clause.list {
            for expr in list {
                v.visit_expr(expr);
            }
        }
        v.visit_line_comment(&mut clause.comment);
        walk_items(v, &mut clause.body);
    }
}

pub fn walk_stmt<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Decl(decl) => walk_gen_decl(v, decl),
        Stmt::Empty(_) => {}
        Stmt::Labeled(labeled) => {
            v.visit_ident(&mut labeled.label, IdentRole::Label);
            v.visit_stmt(&mut labeled.stmt);
        }
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Send(send) => {
            v.visit_expr(&mut send.chan);
            v.visit_expr(&mut send.value);
        }
        Stmt::IncDec(stmt) => v.visit_expr(&mut stmt.x),
        Stmt::Assign(assign) => {
            for lhs in &mut assign.lhs {
                match (assign.op, lhs) {
                    (AssignOp::Define, Expr::Ident(ident)) => {
                        v.visit_ident(ident, IdentRole::Declaration)
                    }
                    (_, lhs) => v.visit_expr(lhs),
                }
            }
            for rhs in &mut assign.rhs {
                v.visit_expr(rhs);
            }
        }
        Stmt::Go(stmt) => v.visit_expr(&mut stmt.call),
        Stmt::Defer(stmt) => v.visit_expr(&mut stmt.call),
        Stmt::Return(ret) => {
            for expr in &mut ret.results {
                v.visit_expr(expr);
            }
        }
        Stmt::Branch(branch) => {
            if let Some(label) = &mut branch.label {
                v.visit_ident(label, IdentRole::Label);
            }
        }
        Stmt::Block(block) => walk_block(v, block),
        Stmt::If(stmt) => {
            walk_opt_stmt(v, &mut stmt.init);
            v.visit_expr(&mut stmt.cond);
            walk_block(v, &mut stmt.then);
            walk_opt_stmt(v, &mut stmt.els);
        }
        Stmt::Switch(stmt) => {
            walk_opt_stmt(v, &mut stmt.init);
            if let Some(tag) = &mut stmt.tag {
                v.visit_expr(tag);
            }
            walk_case_clauses(v, &mut stmt.clauses);
            v.visit_comment_group(&mut stmt.trailer);
        }
        Stmt::TypeSwitch(stmt) => {
            walk_opt_stmt(v, &mut stmt.init);
            v.visit_stmt(&mut stmt.guard);
            walk_case_clauses(v, &mut stmt.clauses);
            v.visit_comment_group(&mut stmt.trailer);
        }
        Stmt::Select(stmt) => {
            for clause in &mut stmt.clauses {
                v.visit_comment_group(&mut clause.doc);
                walk_opt_stmt(v, &mut clause.comm);
                v.visit_line_comment(&mut clause.comment);
                walk_items(v, &mut clause.body);
            }
            v.visit_comment_group(&mut stmt.trailer);
        }
        Stmt::For(stmt) => {
            walk_opt_stmt(v, &mut stmt.init);
            if let Some(cond) = &mut stmt.cond {
                v.visit_expr(cond);
            }
            walk_opt_stmt(v, &mut stmt.post);
            walk_block(v, &mut stmt.body);
        }
        Stmt::Range(stmt) => {
            let define = stmt.op == AssignOp::Define;
            for target in [&mut stmt.key, &mut stmt.value].into_iter().flatten() {
                match target {
                    Expr::Ident(ident) if define => v.visit_ident(ident, IdentRole::Declaration),
                    other => v.visit_expr(other),
                }
            }
            v.visit_expr(&mut stmt.x);
            walk_block(v, &mut stmt.body);
        }
    }
}

pub fn walk_expr<V: VisitorMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Ident(ident) => v.visit_ident(ident, IdentRole::Reference),
        Expr::BasicLit(_) => {}
        Expr::CompositeLit(lit) => {
            if let Some(ty) = &mut lit.ty {
                v.visit_expr(ty);
            }
            for element in &mut lit.elements {
                v.visit_comment_group(&mut element.doc);
                match &mut element.key {
                    Some(Expr::Ident(key)) => v.visit_ident(key, IdentRole::LiteralKey),
                    Some(key) => v.visit_expr(key),
                    None => {}
                }
                v.visit_expr(&mut element.value);
                v.visit_line_comment(&mut element.comment);
            }
            v.visit_comment_group(&mut lit.trailer);
        }
        Expr::FuncLit(lit) => {
            walk_func_type(v, &mut lit.ty);
            walk_block(v, &mut lit.body);
        }
        Expr::Paren(paren) => v.visit_expr(&mut paren.x),
        Expr::Selector(sel) => {
            v.visit_expr(&mut sel.x);
            v.visit_ident(&mut sel.sel, IdentRole::Selector);
        }
        Expr::Index(index) => {
            v.visit_expr(&mut index.x);
            for expr in &mut index.indices {
                v.visit_expr(expr);
            }
        }
        Expr::Slice(slice) => {
            v.visit_expr(&mut slice.x);
            for part in [&mut slice.low, &mut slice.high, &mut slice.max]
                .into_iter()
                .flatten()
            {
                v.visit_expr(part);
            }
        }
        Expr::TypeAssert(assert) => {
            v.visit_expr(&mut assert.x);
            if let Some(ty) = &mut assert.ty {
                v.visit_expr(ty);
            }
        }
        Expr::Call(call) => {
            v.visit_expr(&mut call.fun);
            for arg in &mut call.args {
                v.visit_expr(arg);
            }
        }
        Expr::Star(star) => v.visit_expr(&mut star.x),
        Expr::Unary(unary) => v.visit_expr(&mut unary.x),
        Expr::Binary(binary) => {
            v.visit_expr(&mut binary.x);
            v.visit_expr(&mut binary.y);
        }
        Expr::Ellipsis(ellipsis) => {
            if let Some(elem) = &mut ellipsis.elem {
                v.visit_expr(elem);
            }
        }
        Expr::ArrayType(array) => {
            if let Some(len) = &mut array.len {
                v.visit_expr(len);
            }
            v.visit_expr(&mut array.elem);
        }
        Expr::MapType(map) => {
            v.visit_expr(&mut map.key);
            v.visit_expr(&mut map.value);
        }
        Expr::ChanType(chan) => v.visit_expr(&mut chan.value),
        Expr::FuncType(func) => walk_func_type(v, func),
        Expr::StructType(st) => walk_field_list(v, &mut st.fields, FieldContext::Struct),
        Expr::InterfaceType(it) => walk_field_list(v, &mut it.methods, FieldContext::Interface),
    }
}
