//! 文の出力

use crate::ast::*;

use super::expr_printer::strip_parens;
use super::Printer;

impl Printer {
    /// `{` から `}` まで。中身は1段深くインデントする
    pub(super) fn block(&mut self, block: &Block) {
        self.text("{");
        self.line_comment(&block.opening_comment);
        self.out.indent();
        self.stmt_list(&block.items);
        self.trailer(&block.trailer, !block.items.is_empty());
        self.out.dedent();
        self.out.newline();
        self.text("}");
    }

    fn stmt_list(&mut self, items: &[BlockItem]) {
        let mut first = true;
        let mut prev_multi_line = false;
        for item in items {
            let bare_empty = matches!(item.stmt, Stmt::Empty(_))
                && item.doc.is_empty()
                && item.comment.is_none();
            if bare_empty {
                continue;
            }
            if item.blank_before {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            if first || prev_multi_line {
                self.out.section();
            }
            self.doc(&item.doc);
            let start = self.out.line_count();
            self.stmt(&item.stmt);
            self.line_comment(&item.comment);
            prev_multi_line = self.out.line_count() > start;
            first = false;
        }
    }

    pub(super) fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.gen_decl(decl),
            Stmt::Empty(_) => {}
            Stmt::Labeled(labeled) => {
                // ラベルは1段浅く置く
                self.out.dedent();
                self.text(&labeled.label.name);
                self.text(":");
                self.out.indent();
                if !matches!(*labeled.stmt, Stmt::Empty(_)) {
                    self.out.newline();
                    self.stmt(&labeled.stmt);
                }
            }
            Stmt::Expr(x) => self.expr0(x, 1),
            Stmt::Send(send) => {
                self.expr0(&send.chan, 1);
                self.text(" <- ");
                self.expr0(&send.value, 1);
            }
            Stmt::IncDec(incdec) => {
                self.expr0(&incdec.x, 2);
                self.text(if incdec.inc { "++" } else { "--" });
            }
            Stmt::Assign(assign) => {
                let depth = if assign.lhs.len() > 1 && assign.rhs.len() > 1 { 2 } else { 1 };
                self.expr_list(&assign.lhs, depth);
                self.blank();
                self.text(assign.op.as_str());
                self.blank();
                self.expr_list(&assign.rhs, depth);
            }
            Stmt::Go(go) => {
                self.text("go ");
                self.expr(&go.call);
            }
            Stmt::Defer(defer) => {
                self.text("defer ");
                self.expr(&defer.call);
            }
            Stmt::Return(ret) => {
                self.text("return");
                if !ret.results.is_empty() {
                    self.blank();
                    self.expr_list(&ret.results, 1);
                }
            }
            Stmt::Branch(branch) => {
                self.text(branch.kind.as_str());
                if let Some(label) = &branch.label {
                    self.blank();
                    self.text(&label.name);
                }
            }
            Stmt::Block(block) => self.block(block),
            Stmt::If(stmt) => self.if_stmt(stmt),
            Stmt::Switch(switch) => {
                self.text("switch");
                self.control_clause(false, switch.init.as_deref(), switch.tag.as_ref(), None);
                self.case_clauses(&switch.clauses, &switch.trailer);
            }
            Stmt::TypeSwitch(switch) => {
                self.text("switch");
                if let Some(init) = &switch.init {
                    self.blank();
                    self.stmt(init);
                    self.text(";");
                }
                self.blank();
                self.stmt(&switch.guard);
                self.blank();
                self.case_clauses(&switch.clauses, &switch.trailer);
            }
            Stmt::Select(select) => {
                self.text("select ");
                if select.clauses.is_empty() && select.trailer.is_empty() {
                    self.text("{}");
                } else {
                    self.comm_clauses(&select.clauses, &select.trailer);
                }
            }
            Stmt::For(stmt) => {
                self.text("for");
                self.control_clause(
                    true,
                    stmt.init.as_deref(),
                    stmt.cond.as_ref(),
                    stmt.post.as_deref(),
                );
                self.block(&stmt.body);
            }
            Stmt::Range(range) => {
                self.text("for ");
                if let Some(key) = &range.key {
                    self.expr(key);
                    if let Some(value) = &range.value {
                        self.text(", ");
                        self.expr(value);
                    }
                    self.blank();
                    self.text(range.op.as_str());
                    self.blank();
                }
                self.text("range ");
                self.expr(strip_parens(&range.x));
                self.blank();
                self.block(&range.body);
            }
        }
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.text("if");
        self.control_clause(false, stmt.init.as_deref(), Some(&stmt.cond), None);
        self.block(&stmt.then);
        if let Some(els) = &stmt.els {
            self.text(" else ");
            self.stmt(els);
        }
    }

    /// `if`、`for`、`switch` のヘッダ。終わりは `{` の前の空白まで出力する
    fn control_clause(
        &mut self,
        is_for: bool,
        init: Option<&Stmt>,
        expr: Option<&Expr>,
        post: Option<&Stmt>,
    ) {
        self.blank();
        let mut needs_blank = false;
        if init.is_none() && post.is_none() {
            if let Some(expr) = expr {
                self.expr(strip_parens(expr));
                needs_blank = true;
            }
        } else {
            if let Some(init) = init {
                self.stmt(init);
            }
            self.text("; ");
            if let Some(expr) = expr {
                self.expr(strip_parens(expr));
                needs_blank = true;
            }
            if is_for {
                self.text("; ");
                needs_blank = false;
                if let Some(post) = post {
                    self.stmt(post);
                    needs_blank = true;
                }
            }
        }
        if needs_blank {
            self.blank();
        }
    }

    /// `switch` の本体。`case` は `switch` と同じ深さに置く
    fn case_clauses(&mut self, clauses: &[CaseClause], trailer: &[Comment]) {
        self.text("{");
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 && clause.blank_before {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            self.out.section();
            self.doc(&clause.doc);
            match &clause.list {
                Some(list) => {
                    self.text("case ");
                    self.expr_list(list, 1);
                }
                None => self.text("default"),
            }
            self.text(":");
            self.line_comment(&clause.comment);
            self.out.indent();
            self.stmt_list(&clause.body);
            self.out.dedent();
        }
        self.clause_trailer(!clauses.is_empty(), trailer);
        self.out.newline();
        self.text("}");
    }

    fn comm_clauses(&mut self, clauses: &[CommClause], trailer: &[Comment]) {
        self.text("{");
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 && clause.blank_before {
                self.out.blank_line();
            } else {
                self.out.ensure_newline();
            }
            self.out.section();
            self.doc(&clause.doc);
            match &clause.comm {
                Some(comm) => {
                    self.text("case ");
                    self.stmt(comm);
                }
                None => self.text("default"),
            }
            self.text(":");
            self.line_comment(&clause.comment);
            self.out.indent();
            self.stmt_list(&clause.body);
            self.out.dedent();
        }
        self.clause_trailer(!clauses.is_empty(), trailer);
        self.out.newline();
        self.text("}");
    }

    /// 最後の節の後ろのコメントは節の本体と同じ深さに置く
    fn clause_trailer(&mut self, has_clauses: bool, trailer: &[Comment]) {
        if trailer.is_empty() {
            return;
        }
        if has_clauses {
            self.out.indent();
        }
        self.trailer(trailer, has_clauses);
        if has_clauses {
            self.out.dedent();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_source;
    use crate::printer::print_file;
    use pretty_assertions::assert_eq;

    fn format_body(body: &str) -> String {
        let source = format!("package p\n\nfunc f() {{\n{body}}}\n");
        let out = print_file(&parse_source(&source).unwrap());
        out.strip_prefix("package p\n\nfunc f() {\n")
            .and_then(|rest| rest.strip_suffix("}\n"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_statements_are_reindented() {
        assert_eq!(format_body("x := 1\n    y := 2\n"), "\tx := 1\n\ty := 2\n");
    }

    #[test]
    fn test_trailing_comments_align() {
        assert_eq!(
            format_body("\tx := 1 // a\n\tlonger := 2 // b\n"),
            "\tx := 1      // a\n\tlonger := 2 // b\n"
        );
    }

    #[test]
    fn test_if_header_parens_are_stripped() {
        assert_eq!(
            format_body("\tif (x > 1) {\n\t\treturn\n\t}\n"),
            "\tif x > 1 {\n\t\treturn\n\t}\n"
        );
    }

    #[test]
    fn test_switch_cases_at_switch_depth() {
        assert_eq!(
            format_body("\tswitch x {\n\tcase 1:\n\t\tf()\n\tdefault:\n\t}\n"),
            "\tswitch x {\n\tcase 1:\n\t\tf()\n\tdefault:\n\t}\n"
        );
    }

    #[test]
    fn test_for_clause_forms() {
        assert_eq!(
            format_body("\tfor i := 0; i < n; i++ {\n\t}\n\tfor {\n\t}\n"),
            "\tfor i := 0; i < n; i++ {\n\t}\n\tfor {\n\t}\n"
        );
    }

    #[test]
    fn test_label_is_outdented() {
        assert_eq!(
            format_body("outer:\n\tfor {\n\t\tbreak outer\n\t}\n"),
            "outer:\n\tfor {\n\t\tbreak outer\n\t}\n"
        );
    }

    #[test]
    fn test_else_if_chain() {
        assert_eq!(
            format_body("\tif a {\n\t} else if b {\n\t} else {\n\t}\n"),
            "\tif a {\n\t} else if b {\n\t} else {\n\t}\n"
        );
    }
}
