//! 式と型の出力
//!
//! 二項演算子まわりの空白は gofmt と同じく、式の入れ子の深さと
//! 優先順位の混ざり方で決める（`a + b*c`、`x[i+1:]` など）。

use crate::ast::*;

use super::Printer;

const LOWEST_PREC: u8 = 0;
const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;

/// この幅以下のキーは比率に関係なく桁を揃える
const SMALL_KEY: usize = 40;

impl Printer {
    pub(super) fn expr(&mut self, x: &Expr) {
        self.expr1(x, LOWEST_PREC, 1);
    }

    pub(super) fn expr0(&mut self, x: &Expr, depth: usize) {
        self.expr1(x, LOWEST_PREC, depth);
    }

    /// カンマ区切りで1行に並べる
    pub(super) fn expr_list(&mut self, list: &[Expr], depth: usize) {
        for (i, x) in list.iter().enumerate() {
            if i > 0 {
                self.text(", ");
            }
            self.expr0(x, depth);
        }
    }

    pub(super) fn ident_list(&mut self, names: &[Ident]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.text(", ");
            }
            self.text(&name.name);
        }
    }

    fn expr1(&mut self, x: &Expr, prec1: u8, depth: usize) {
        match x {
            Expr::Ident(ident) => self.text(&ident.name),
            Expr::BasicLit(lit) => self.literal(lit),
            Expr::Binary(binary) => {
                let depth = depth.max(1);
                self.binary_expr(binary, prec1, cutoff(binary, depth), depth);
            }
            Expr::Star(star) => {
                if UNARY_PREC < prec1 {
                    self.text("(");
                    self.token("*");
                    self.expr(&star.x);
                    self.text(")");
                } else {
                    self.token("*");
                    self.expr(&star.x);
                }
            }
            Expr::Unary(unary) => {
                if UNARY_PREC < prec1 {
                    self.text("(");
                    self.expr(x);
                    self.text(")");
                } else {
                    self.token(unary.op.as_str());
                    self.expr1(&unary.x, UNARY_PREC, depth);
                }
            }
            Expr::FuncLit(lit) => {
                let start_line = self.out.line_count();
                let start_col = self.out.column();
                self.text("func");
                self.signature(&lit.ty);
                let header = (self.out.line_count() == start_line)
                    .then(|| self.out.column().saturating_sub(start_col));
                self.func_body(header, false, &lit.body);
            }
            Expr::Paren(paren) => {
                if let Expr::Paren(_) = *paren.x {
                    self.expr0(&paren.x, depth);
                } else {
                    self.text("(");
                    self.expr0(&paren.x, reduce_depth(depth));
                    self.text(")");
                }
            }
            Expr::Selector(sel) => {
                self.expr1(&sel.x, HIGHEST_PREC, depth);
                self.text(".");
                self.text(&sel.sel.name);
            }
            Expr::TypeAssert(assert) => {
                self.expr1(&assert.x, HIGHEST_PREC, depth);
                self.text(".(");
                match &assert.ty {
                    Some(ty) => self.expr(ty),
                    None => self.text("type"),
                }
                self.text(")");
            }
            Expr::Index(index) => {
                self.expr1(&index.x, HIGHEST_PREC, 1);
                self.text("[");
                if let [single] = index.indices.as_slice() {
                    self.expr0(single, depth + 1);
                } else {
                    self.expr_list(&index.indices, depth + 1);
                }
                self.text("]");
            }
            Expr::Slice(slice) => self.slice_expr(slice, depth),
            Expr::Call(call) => self.call_expr(call, depth),
            Expr::CompositeLit(lit) => self.composite_lit(lit, depth),
            Expr::Ellipsis(ellipsis) => {
                self.text("...");
                if let Some(elem) = &ellipsis.elem {
                    self.expr(elem);
                }
            }
            Expr::ArrayType(array) => {
                self.text("[");
                if let Some(len) = &array.len {
                    self.expr(len);
                }
                self.text("]");
                self.expr(&array.elem);
            }
            Expr::MapType(map) => {
                self.text("map[");
                self.expr(&map.key);
                self.text("]");
                self.expr(&map.value);
            }
            Expr::ChanType(chan) => {
                match chan.dir {
                    ChanDir::Both => self.text("chan"),
                    ChanDir::Recv => self.text("<-chan"),
                    ChanDir::Send => self.text("chan<-"),
                }
                self.blank();
                self.expr(&chan.value);
            }
            Expr::FuncType(ty) => {
                self.text("func");
                self.signature(ty);
            }
            Expr::StructType(st) => {
                self.text("struct");
                self.field_list(&st.fields, true);
            }
            Expr::InterfaceType(it) => {
                self.text("interface");
                self.field_list(&it.methods, false);
            }
        }
    }

    fn binary_expr(&mut self, x: &BinaryExpr, prec1: u8, cutoff: u8, depth: usize) {
        let prec = x.op.precedence();
        if prec < prec1 {
            // 括弧は深さを1段戻す
            let depth = reduce_depth(depth);
            self.text("(");
            self.binary_expr(x, LOWEST_PREC, self::cutoff(x, depth), depth);
            self.text(")");
            return;
        }

        let mut print_blank = prec < cutoff;
        self.expr1(&x.x, prec, depth + diff_prec(&x.x, prec));
        if print_blank {
            self.blank();
        }
        self.token(x.op.as_str());
        if x.line_break {
            self.out.indent();
            self.out.newline();
            print_blank = false;
        }
        if print_blank {
            self.blank();
        }
        self.expr1(&x.y, prec + 1, depth + 1);
        if x.line_break {
            self.out.dedent();
        }
    }

    fn slice_expr(&mut self, slice: &SliceExpr, depth: usize) {
        self.expr1(&slice.x, HIGHEST_PREC, 1);
        self.text("[");
        let mut indices = vec![slice.low.as_deref(), slice.high.as_deref()];
        if slice.slice3 {
            indices.push(slice.max.as_deref());
        }

        // 2つ以上のインデックスのどれかが二項式なら ':' の前後に空白を入れる
        let needs_blanks = depth <= 1 && {
            let present: Vec<&Expr> = indices.iter().flatten().copied().collect();
            present.len() > 1 && present.iter().any(|x| matches!(x, Expr::Binary(_)))
        };

        for (i, index) in indices.iter().enumerate() {
            if i > 0 {
                if indices[i - 1].is_some() && needs_blanks {
                    self.blank();
                }
                self.text(":");
                if index.is_some() && needs_blanks {
                    self.blank();
                }
            }
            if let Some(index) = index {
                self.expr0(index, depth + 1);
            }
        }
        self.text("]");
    }

    fn call_expr(&mut self, call: &CallExpr, depth: usize) {
        let depth = if call.args.len() > 1 { depth + 1 } else { depth };
        if let Expr::FuncType(_) = *call.fun {
            // 関数型への変換は括弧が要る
            self.text("(");
            self.expr1(&call.fun, HIGHEST_PREC, depth);
            self.text(")");
        } else {
            self.expr1(&call.fun, HIGHEST_PREC, depth);
        }

        self.text("(");
        let mut indented = false;
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.text(",");
            }
            if call.arg_breaks.get(i).copied().unwrap_or(false) {
                if !indented {
                    self.out.indent();
                    indented = true;
                }
                self.out.newline();
            } else if i > 0 {
                self.blank();
            }
            self.expr0(arg, depth);
        }
        if call.ellipsis {
            self.text("...");
        }
        if call.closing_break {
            self.text(",");
            self.out.newline();
        }
        if indented {
            self.out.dedent();
        }
        self.text(")");
    }

    fn composite_lit(&mut self, lit: &CompositeLit, depth: usize) {
        if let Some(ty) = &lit.ty {
            self.expr1(ty, HIGHEST_PREC, depth);
        }
        self.text("{");

        let count = lit.elements.len();
        let mut indented = false;
        let mut prev_size = 0;
        let mut prev_multi_line = false;
        let mut prev_break = 0;
        let mut ln_sum = 0.0_f64;
        let mut sizes = 0;

        for (i, element) in lit.elements.iter().enumerate() {
            let size = element_size(element);
            let breaks = element.line_break || !element.doc.is_empty();

            if breaks {
                if !indented {
                    self.out.indent();
                    indented = true;
                }
                if i > 0 && element.blank_before {
                    self.out.blank_line();
                } else {
                    self.out.newline();
                }
                let use_ff = match (prev_size, size) {
                    (0, _) | (_, 0) => true,
                    _ if sizes == 0 || (prev_size <= SMALL_KEY && size <= SMALL_KEY) => false,
                    _ => {
                        // 桁揃えが不自然になる長さの差なら区切る
                        let geomean = (ln_sum / sizes as f64).exp();
                        let ratio = size as f64 / geomean;
                        2.5 * ratio <= 1.0 || 2.5 <= ratio
                    }
                };
                if i == 0 || use_ff || prev_multi_line || prev_break + 1 < i {
                    self.out.section();
                }
                prev_break = i;
                self.doc(&element.doc);
            } else if i > 0 {
                self.blank();
            }

            let start = self.out.line_count();
            match &element.key {
                Some(key) if count > 1 && breaks && size > 0 => {
                    self.expr(key);
                    self.text(":");
                    self.out.cell();
                    self.expr(&element.value);
                }
                Some(key) => {
                    self.expr(key);
                    self.text(": ");
                    self.expr(&element.value);
                }
                None => self.expr0(&element.value, 1),
            }
            if i + 1 < count || lit.closing_break {
                self.text(",");
            }
            self.line_comment(&element.comment);

            prev_multi_line = self.out.line_count() > start;
            if size > 0 {
                ln_sum += (size as f64).ln();
                sizes += 1;
            }
            prev_size = size;
        }

        if !lit.trailer.is_empty() {
            if !indented {
                self.out.indent();
                indented = true;
            }
            self.trailer(&lit.trailer, count > 0);
        }
        if indented {
            self.out.dedent();
        }
        if lit.closing_break || !lit.trailer.is_empty() {
            self.out.newline();
        }
        self.text("}");
    }

    /// パラメータ・戻り値
    pub(super) fn signature(&mut self, ty: &FuncType) {
        self.parameters(&ty.params, false);
        if let Some(results) = &ty.results {
            match results.fields.as_slice() {
                [] => {}
                [single] if single.names.is_empty() => {
                    self.blank();
                    self.expr(strip_parens_always(&single.ty));
                }
                _ => {
                    self.blank();
                    self.parameters(results, false);
                }
            }
        }
    }

    /// `(a, b int)` または型パラメータの `[T any]`
    pub(super) fn parameters(&mut self, list: &FieldList, brackets: bool) {
        let (open, close) = if brackets { ("[", "]") } else { ("(", ")") };
        self.text(open);
        let mut indented = false;
        for (i, field) in list.fields.iter().enumerate() {
            if i > 0 {
                self.text(",");
            }
            if field.line_break {
                if !indented {
                    self.out.indent();
                    indented = true;
                }
                self.out.newline();
            } else if i > 0 {
                self.blank();
            }
            if !field.names.is_empty() {
                self.ident_list(&field.names);
                self.blank();
            }
            self.expr(strip_parens_always(&field.ty));
        }

        if list.closing_break && !list.fields.is_empty() {
            self.text(",");
            self.out.newline();
        } else if brackets {
            if let [field] = list.fields.as_slice() {
                // [P *T] は式としても読めるので末尾のカンマで型パラメータにする
                if field.names.len() == 1 && combines_with_name(&field.ty) {
                    self.text(",");
                }
            }
        }
        if indented {
            self.out.dedent();
        }
        self.text(close);
    }

    /// 構造体のフィールドまたはインターフェースの要素
    pub(super) fn field_list(&mut self, list: &FieldList, is_struct: bool) {
        let one_line_source = !list.closing_break
            && list.fields.first().map_or(true, |field| !field.line_break);

        if one_line_source && !list.has_comments() {
            match list.fields.as_slice() {
                [] => {
                    self.text("{}");
                    return;
                }
                [field] => {
                    self.text("{ ");
                    if is_struct {
                        if !field.names.is_empty() {
                            self.ident_list(&field.names);
                            self.blank();
                        }
                        self.expr(&field.ty);
                        if let Some(tag) = &field.tag {
                            self.blank();
                            self.text(tag);
                        }
                    } else {
                        self.interface_elem(field);
                    }
                    self.text(" }");
                    return;
                }
                _ => {}
            }
        }

        self.text(" {");
        self.out.indent();
        let aligned = list.fields.len() > 1;
        let mut prev_multi_line = false;
        for (i, field) in list.fields.iter().enumerate() {
            if i > 0 && field.blank_before {
                self.out.blank_line();
            } else {
                self.out.newline();
            }
            if i == 0 || prev_multi_line {
                self.out.section();
            }
            self.doc(&field.doc);
            let start = self.out.line_count();
            if is_struct {
                self.struct_field(field, aligned);
            } else {
                self.interface_elem(field);
                self.line_comment(&field.comment);
            }
            prev_multi_line = self.out.line_count() > start;
        }
        self.trailer(&list.trailer, !list.fields.is_empty());
        self.out.dedent();
        self.out.newline();
        self.text("}");
    }

    /// 名前・型・タグ・コメントをそれぞれ別のセルに置く
    fn struct_field(&mut self, field: &Field, aligned: bool) {
        let mut extra_cells = if field.names.is_empty() {
            self.expr(&field.ty);
            2
        } else {
            self.ident_list(&field.names);
            self.separator(aligned);
            self.expr(&field.ty);
            1
        };
        if let Some(tag) = &field.tag {
            self.separator(aligned);
            self.text(tag);
            extra_cells = 0;
        }
        if let Some(comment) = &field.comment {
            if aligned && extra_cells > 0 {
                for _ in 0..extra_cells {
                    self.out.cell();
                }
            } else {
                self.out.cell();
            }
            self.comment(comment);
        }
    }

    fn separator(&mut self, aligned: bool) {
        if aligned {
            self.out.cell();
        } else {
            self.blank();
        }
    }

    fn interface_elem(&mut self, field: &Field) {
        match (field.names.first(), &field.ty) {
            (Some(name), Expr::FuncType(sig)) => {
                self.text(&name.name);
                self.signature(sig);
            }
            _ => self.expr(&field.ty),
        }
    }
}

/// 1行に収まる要素の幅。キー付きならキーの幅。収まらなければ 0
fn element_size(element: &Element) -> usize {
    let fits = Printer::flat_width(|p| {
        if let Some(key) = &element.key {
            p.expr(key);
            p.text(": ");
        }
        p.expr(&element.value);
    });
    match (fits, &element.key) {
        (None, _) => 0,
        (Some(_), Some(key)) => Printer::flat_width(|p| p.expr(key)).unwrap_or(0),
        (Some(width), None) => width,
    }
}

fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}

fn diff_prec(x: &Expr, prec: u8) -> usize {
    match x {
        Expr::Binary(binary) if binary.op.precedence() == prec => 0,
        _ => 1,
    }
}

/// 空白を省いたときに隣り合うと困る演算子の組と、優先順位の混ざり方を調べる
fn walk_binary(e: &BinaryExpr) -> (bool, bool, u8) {
    let prec = e.op.precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Expr::Binary(left) = &*e.x {
        if left.op.precedence() >= prec {
            let (h4, h5, mp) = walk_binary(left);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }

    match &*e.y {
        Expr::Binary(right) if right.op.precedence() > prec => {
            let (h4, h5, mp) = walk_binary(right);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
        Expr::Star(_) if e.op == BinaryOp::Div => max_problem = 5,
        Expr::Unary(right) => match (e.op.as_str(), right.op.as_str()) {
            ("/", "*") | ("&", "&") | ("&", "^") => max_problem = 5,
            ("+", "+") | ("-", "-") => max_problem = max_problem.max(4),
            _ => {}
        },
        _ => {}
    }
    (has4, has5, max_problem)
}

/// この優先順位より低い演算子の前後にだけ空白を入れる
fn cutoff(e: &BinaryExpr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(e);
    if max_problem > 0 {
        return max_problem + 1;
    }
    match (has4 && has5, depth == 1) {
        (true, true) => 5,
        (true, false) => 4,
        (false, true) => 6,
        (false, false) => 4,
    }
}

fn strip_parens_always(x: &Expr) -> &Expr {
    match x {
        Expr::Paren(paren) => strip_parens_always(&paren.x),
        _ => x,
    }
}

/// `if`/`for`/`switch` の条件の余分な括弧を外す。
/// 中に括弧なしの `T{...}` があると外せない
pub(super) fn strip_parens(x: &Expr) -> &Expr {
    match x {
        Expr::Paren(paren) if !has_bare_type_literal(&paren.x) => strip_parens(&paren.x),
        _ => x,
    }
}

fn has_bare_type_literal(x: &Expr) -> bool {
    match x {
        Expr::Paren(_) => false,
        Expr::CompositeLit(lit) => lit.ty.as_deref().is_some_and(Expr::is_type_name),
        Expr::Selector(sel) => has_bare_type_literal(&sel.x),
        Expr::Index(index) => {
            has_bare_type_literal(&index.x) || index.indices.iter().any(has_bare_type_literal)
        }
        Expr::Slice(slice) => {
            has_bare_type_literal(&slice.x)
                || [&slice.low, &slice.high, &slice.max]
                    .into_iter()
                    .flatten()
                    .any(|x| has_bare_type_literal(x))
        }
        Expr::TypeAssert(assert) => has_bare_type_literal(&assert.x),
        Expr::Call(call) => {
            has_bare_type_literal(&call.fun) || call.args.iter().any(has_bare_type_literal)
        }
        Expr::Star(star) => has_bare_type_literal(&star.x),
        Expr::Unary(unary) => has_bare_type_literal(&unary.x),
        Expr::Binary(binary) => has_bare_type_literal(&binary.x) || has_bare_type_literal(&binary.y),
        _ => false,
    }
}

fn combines_with_name(x: &Expr) -> bool {
    match x {
        Expr::Star(_) => true,
        Expr::Binary(binary) => combines_with_name(&binary.x),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use test_case::test_case;

    /// `var _ = <expr>` の右辺を整形して返す
    fn format_expr(source: &str) -> String {
        let file = parse_source(&format!("package p\nvar _ = {source}\n")).unwrap();
        let out = super::super::print_file(&file);
        out.trim_start_matches("package p\n\nvar _ = ")
            .trim_end()
            .to_string()
    }

    #[test_case("a+b" => "a + b"; "simple sum")]
    #[test_case("a + b*c" => "a + b*c"; "mixed precedence")]
    #[test_case("a*b" => "a * b"; "lone product")]
    #[test_case("x[i+1 : j]" => "x[i+1 : j]"; "slice with binary index")]
    #[test_case("x[1:2]" => "x[1:2]"; "plain slice")]
    #[test_case("f(a+b, c)" => "f(a+b, c)"; "call args tighten")]
    #[test_case("(a+b)*c" => "(a + b) * c"; "parens reset depth")]
    #[test_case("- -x" => "- -x"; "unary minus pair")]
    #[test_case("a / *p" => "a / *p"; "division by pointer")]
    #[test_case("&T{}" => "&T{}"; "address of literal")]
    #[test_case("<-ch" => "<-ch"; "receive")]
    #[test_case("func(x int) int { return x }" => "func(x int) int { return x }"; "one line func literal")]
    #[test_case("map[string][]int{}" => "map[string][]int{}"; "map type literal")]
    #[test_case("struct{ A int }{1}" => "struct{ A int }{1}"; "anonymous struct literal")]
    fn test_expression_spacing(source: &str) -> String {
        format_expr(source)
    }

    #[test]
    fn test_keyed_elements_align() {
        let source = "T{\n\tA: 1,\n\tLonger: 2,\n}";
        assert_eq!(format_expr(source), "T{\n\tA:      1,\n\tLonger: 2,\n}");
    }

    #[test]
    fn test_call_args_keep_line_breaks() {
        let source = "f(a,\n\tb)";
        assert_eq!(format_expr(source), "f(a,\n\tb)");
    }

    #[test]
    fn test_strip_parens_keeps_type_literal() {
        let source = parse_source("package p\nvar _ = (T{})\n").unwrap();
        let Decl::Gen(gen) = &source.decls[0] else {
            panic!("expected var");
        };
        let Spec::Value(spec) = &gen.specs[0] else {
            panic!("expected value spec");
        };
        assert!(matches!(strip_parens(&spec.values[0]), Expr::Paren(_)));
    }
}
