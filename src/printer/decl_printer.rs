//! 宣言の出力

use crate::ast::*;

use super::Printer;

/// 1行にまとめる関数の最大幅（ヘッダと本体の合計）
const MAX_ONE_LINE: usize = 100;

impl Printer {
    pub(super) fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Gen(gen) => self.gen_decl(gen),
            Decl::Func(func) => self.func_decl(func),
        }
    }

    pub(super) fn import_decl(&mut self, decl: &ImportDecl) {
        self.doc(&decl.doc);
        if !decl.grouped && decl.specs.len() == 1 {
            let spec = &decl.specs[0];
            self.doc(&spec.doc);
            self.text("import ");
            self.import_spec(spec);
            self.line_comment(&spec.comment);
            return;
        }

        self.text("import (");
        if !decl.specs.is_empty() || !decl.trailer.is_empty() {
            self.out.indent();
            for (i, spec) in decl.specs.iter().enumerate() {
                if i > 0 && spec.blank_before {
                    self.out.blank_line();
                } else {
                    self.out.ensure_newline();
                }
                if i == 0 {
                    self.out.section();
                }
                self.doc(&spec.doc);
                self.import_spec(spec);
                self.line_comment(&spec.comment);
            }
            self.trailer(&decl.trailer, !decl.specs.is_empty());
            self.out.dedent();
            self.out.newline();
        }
        self.text(")");
    }

    fn import_spec(&mut self, spec: &ImportSpec) {
        if let Some(name) = &spec.name {
            self.text(&name.name);
            self.blank();
        }
        self.text(&spec.path);
    }

    /// `const`、`var`、`type`（単独またはグループ）
    pub(super) fn gen_decl(&mut self, decl: &GenDecl) {
        self.doc(&decl.doc);
        self.text(decl.kind.as_str());
        self.blank();

        if !decl.grouped && decl.specs.len() == 1 {
            self.spec(&decl.specs[0]);
            self.line_comment(&decl.comment);
            return;
        }

        self.text("(");
        let count = decl.specs.len();
        if count > 0 || !decl.trailer.is_empty() {
            self.out.indent();
            let keep_types = if count > 1 && decl.kind != GenKind::Type {
                keep_type_column(&decl.specs)
            } else {
                vec![false; count]
            };
            let mut prev_multi_line = false;
            for (i, spec) in decl.specs.iter().enumerate() {
                if i > 0 && spec.blank_before() {
                    self.out.blank_line();
                } else {
                    self.out.ensure_newline();
                }
                if i == 0 || prev_multi_line {
                    self.out.section();
                }
                self.doc(spec.doc());
                let start = self.out.line_count();
                match spec {
                    Spec::Value(value) if count > 1 => self.value_spec_cells(value, keep_types[i]),
                    Spec::Type(ty) if count > 1 => self.type_spec_cells(ty),
                    _ => {
                        self.spec(spec);
                        self.spec_comment(spec);
                    }
                }
                prev_multi_line = self.out.line_count() > start;
            }
            self.trailer(&decl.trailer, count > 0);
            self.out.dedent();
            self.out.newline();
        }
        self.text(")");
        self.line_comment(&decl.comment);
    }

    fn spec_comment(&mut self, spec: &Spec) {
        match spec {
            Spec::Value(value) => self.line_comment(&value.comment),
            Spec::Type(ty) => self.line_comment(&ty.comment),
        }
    }

    /// 桁揃えなしの spec（単独宣言、または1つだけのグループ）
    fn spec(&mut self, spec: &Spec) {
        match spec {
            Spec::Value(value) => {
                self.ident_list(&value.names);
                if let Some(ty) = &value.ty {
                    self.blank();
                    self.expr(ty);
                }
                if !value.values.is_empty() {
                    self.text(" = ");
                    self.expr_list(&value.values, 1);
                }
            }
            Spec::Type(ty) => {
                self.type_spec_head(ty);
                self.blank();
                if ty.assign {
                    self.text("= ");
                }
                self.expr(&ty.ty);
            }
        }
    }

    fn type_spec_head(&mut self, ty: &TypeSpec) {
        self.text(&ty.name.name);
        if let Some(params) = &ty.type_params {
            self.parameters(params, true);
        }
    }

    /// グループ内の `名前 型 = 値 // コメント` を列に分けて出力する
    fn value_spec_cells(&mut self, spec: &ValueSpec, keep_type: bool) {
        // コメントは常に4列目に来るよう空のセルで埋める
        let mut extra_cells = 3;
        self.ident_list(&spec.names);
        if spec.ty.is_some() || keep_type {
            self.out.cell();
            extra_cells -= 1;
        }
        if let Some(ty) = &spec.ty {
            self.expr(ty);
        }
        if !spec.values.is_empty() {
            self.out.cell();
            self.text("= ");
            self.expr_list(&spec.values, 1);
            extra_cells -= 1;
        }
        if let Some(comment) = &spec.comment {
            for _ in 0..extra_cells {
                self.out.cell();
            }
            self.comment(comment);
        }
    }

    fn type_spec_cells(&mut self, ty: &TypeSpec) {
        self.type_spec_head(ty);
        self.out.cell();
        if ty.assign {
            self.text("= ");
        }
        self.expr(&ty.ty);
        self.line_comment(&ty.comment);
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        self.doc(&func.doc);
        let start_line = self.out.line_count();
        let start_col = self.out.column();
        self.text("func ");
        if let Some(recv) = &func.recv {
            self.parameters(recv, false);
            self.blank();
        }
        self.text(&func.name.name);
        if let Some(params) = &func.type_params {
            self.parameters(params, true);
        }
        self.signature(&func.ty);
        if let Some(body) = &func.body {
            let header = (self.out.line_count() == start_line)
                .then(|| self.out.column().saturating_sub(start_col));
            self.func_body(header, true, body);
        }
        self.line_comment(&func.comment);
    }

    /// 関数宣言が1行で出力されるか
    pub(super) fn func_is_one_line(&self, func: &FuncDecl) -> bool {
        match &func.body {
            None => true,
            Some(body) => {
                let header = Printer::flat_width(|p| {
                    p.text("func ");
                    if let Some(recv) = &func.recv {
                        p.parameters(recv, false);
                        p.blank();
                    }
                    p.text(&func.name.name);
                    if let Some(params) = &func.type_params {
                        p.parameters(params, true);
                    }
                    p.signature(&func.ty);
                });
                header.is_some_and(|header| fits_one_line(header, body))
            }
        }
    }

    /// 関数本体。元が1行で短ければ `{ stmt; stmt }` の形で出す。
    /// `header` は同じ行にある関数ヘッダの幅（複数行なら `None`）
    pub(super) fn func_body(&mut self, header: Option<usize>, aligned: bool, body: &Block) {
        if header.is_some_and(|header| fits_one_line(header, body)) {
            if aligned {
                self.out.cell();
            } else {
                self.blank();
            }
            self.text("{");
            if !body.items.is_empty() {
                self.blank();
                for (i, item) in body.items.iter().enumerate() {
                    if i > 0 {
                        self.text("; ");
                    }
                    self.stmt(&item.stmt);
                }
                self.blank();
            }
            self.text("}");
            return;
        }
        self.blank();
        self.block(body);
    }
}

fn fits_one_line(header: usize, body: &Block) -> bool {
    body_size(body).is_some_and(|size| header + size <= MAX_ONE_LINE)
}

/// 1行にしたときの本体の幅。1行にできなければ `None`
fn body_size(body: &Block) -> Option<usize> {
    if !body.one_line || body.items.len() > 5 || body.opening_comment.is_some() {
        return None;
    }
    if !body.trailer.is_empty()
        || body
            .items
            .iter()
            .any(|item| !item.doc.is_empty() || item.comment.is_some())
    {
        return None;
    }
    let mut size = 0;
    for (i, item) in body.items.iter().enumerate() {
        if i > 0 {
            size += 2;
        }
        size += Printer::flat_width(|p| p.stmt(&item.stmt))?;
        if size > MAX_ONE_LINE {
            return None;
        }
    }
    Some(size)
}

/// 値を持つ spec が続く範囲で、どれかに型があれば型の列を残す
fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];
    let has_values = |spec: &Spec| matches!(spec, Spec::Value(v) if !v.values.is_empty());
    let has_type = |spec: &Spec| matches!(spec, Spec::Value(v) if v.ty.is_some());

    let mut i = 0;
    while i < specs.len() {
        if !has_values(&specs[i]) {
            i += 1;
            continue;
        }
        let start = i;
        let mut any_type = false;
        while i < specs.len() && has_values(&specs[i]) {
            any_type |= has_type(&specs[i]);
            i += 1;
        }
        if any_type {
            keep[start..i].fill(true);
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_source;
    use crate::printer::print_file;
    use pretty_assertions::assert_eq;

    fn format(source: &str) -> String {
        print_file(&parse_source(source).unwrap())
    }

    #[test]
    fn test_grouped_consts_align() {
        let source = "package p\n\nconst (\n\tA = 1 // one\n\tBcd = 22 // two\n)\n";
        assert_eq!(
            format(source),
            "package p\n\nconst (\n\tA   = 1  // one\n\tBcd = 22 // two\n)\n"
        );
    }

    #[test]
    fn test_type_column_is_kept() {
        let source = "package p\n\nvar (\n\ta int = 1\n\tbb = 2\n)\n";
        assert_eq!(
            format(source),
            "package p\n\nvar (\n\ta  int = 1\n\tbb     = 2\n)\n"
        );
    }

    #[test]
    fn test_struct_fields_align() {
        let source = "package p\n\ntype T struct {\n\tName string `json:\"name\"` // n\n\tAge int\n\tEmbedded\n}\n";
        assert_eq!(
            format(source),
            "package p\n\ntype T struct {\n\tName string `json:\"name\"` // n\n\tAge  int\n\tEmbedded\n}\n"
        );
    }

    #[test]
    fn test_one_line_funcs_align() {
        let source = "package p\n\nfunc (t T) A() int { return 1 }\nfunc (t T) Long() int { return 2 }\n";
        assert_eq!(
            format(source),
            "package p\n\nfunc (t T) A() int    { return 1 }\nfunc (t T) Long() int { return 2 }\n"
        );
    }

    #[test]
    fn test_empty_body_on_separate_lines() {
        let source = "package p\n\nfunc f() {\n}\n\nfunc g() {}\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_single_import_without_parens() {
        let source = "package p\n\nimport \"fmt\"\n\nvar _ = fmt.Sprint\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_grouped_imports_keep_blank_lines() {
        let source = "package p\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/x\"\n)\n";
        assert_eq!(format(source), source);
    }
}
