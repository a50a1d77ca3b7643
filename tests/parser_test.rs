//! パーサーテスト
//!
//! Goソースの構文解析のテスト。宣言・文・式の構造と、コメントの付き方を確認する。

#[cfg(test)]
mod tests {
    use gocat::ast::*;
    use gocat::parser::{parse_source, ParseError};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// 解析に成功することを確認するヘルパー関数
    fn assert_parse_success(source: &str) -> File {
        parse_source(source).expect("Parsing should succeed")
    }

    /// 関数本体だけを解析するヘルパー関数
    fn parse_body(body: &str) -> Vec<Stmt> {
        let file = assert_parse_success(&format!("package p\nfunc f() {{\n{body}\n}}\n"));
        match file.decls.into_iter().next() {
            Some(Decl::Func(func)) => func
                .body
                .expect("function has a body")
                .items
                .into_iter()
                .map(|item| item.stmt)
                .collect(),
            other => panic!("expected a function, got {other:?}"),
        }
    }

    /// 式1つを解析するヘルパー関数
    fn parse_expr(expr: &str) -> Expr {
        let file = assert_parse_success(&format!("package p\nvar _ = {expr}\n"));
        match file.decls.into_iter().next() {
            Some(Decl::Gen(mut gen)) => match gen.specs.remove(0) {
                Spec::Value(mut spec) => spec.values.remove(0),
                other => panic!("expected a value spec, got {other:?}"),
            },
            other => panic!("expected a var declaration, got {other:?}"),
        }
    }

    fn names(file: &File) -> Vec<String> {
        file.decls
            .iter()
            .flat_map(|decl| decl.declared_names())
            .map(|ident| ident.name.clone())
            .collect()
    }

    #[test]
    fn test_package_and_imports() {
        let file = assert_parse_success(
            "package main\n\nimport \"fmt\"\n\nimport (\n\t\"os\"\n\tstr \"strings\"\n)\n",
        );
        assert_eq!(file.package.name.name, "main");
        assert_eq!(file.imports.len(), 2);
        assert!(!file.imports[0].grouped);
        assert!(file.imports[1].grouped);
        let paths: Vec<_> = file.import_specs().map(|s| s.path_value()).collect();
        assert_eq!(paths, vec!["fmt", "os", "strings"]);
        let spec = file.import_specs().nth(2).unwrap();
        assert_eq!(spec.name.as_ref().map(|n| n.name.as_str()), Some("str"));
    }

    #[test]
    fn test_top_level_declarations() {
        let file = assert_parse_success(
            "package p\n\
             const A, B = 1, 2\n\
             var (\n\tc int\n\td = \"x\"\n)\n\
             type T struct{ X int }\n\
             type Alias = T\n\
             func F() {}\n\
             func (t *T) M() {}\n",
        );
        assert_eq!(names(&file), vec!["A", "B", "c", "d", "T", "Alias", "F"]);
        assert_eq!(file.decls.len(), 6);
    }

    #[test]
    fn test_generic_declarations() {
        let file = assert_parse_success(
            "package p\n\
             type Number interface {\n\t~int | ~float64\n}\n\
             func Sum[T Number](xs ...T) (total T) {\n\tfor _, x := range xs {\n\t\ttotal += x\n\t}\n\treturn\n}\n\
             var _ = Sum[int]\n",
        );
        match &file.decls[1] {
            Decl::Func(func) => {
                let params = func.type_params.as_ref().expect("type parameters");
                assert_eq!(params.fields.len(), 1);
                assert_eq!(params.fields[0].names[0].name, "T");
            }
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_precedence() {
        match parse_expr("a + b*c") {
            Expr::Binary(add) => {
                assert_eq!(add.op, BinaryOp::Add);
                assert!(matches!(*add.y, Expr::Binary(ref mul) if mul.op == BinaryOp::Mul));
            }
            other => panic!("expected a binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_selector_and_call() {
        match parse_expr("fmt.Sprintf(\"%d\", n)") {
            Expr::Call(call) => {
                assert_eq!(call.args.len(), 2);
                match *call.fun {
                    Expr::Selector(sel) => assert_eq!(sel.sel.name, "Sprintf"),
                    other => panic!("expected a selector, got {other:?}"),
                }
            }
            other => panic!("expected a call, got {other:?}"),
        }
    }

    #[test]
    fn test_keyed_composite_literal() {
        match parse_expr("Point{X: 1, Y: 2}") {
            Expr::CompositeLit(lit) => {
                assert_eq!(lit.elements.len(), 2);
                assert!(matches!(&lit.elements[0].key, Some(Expr::Ident(key)) if key.name == "X"));
            }
            other => panic!("expected a composite literal, got {other:?}"),
        }
    }

    #[test]
    fn test_composite_literal_not_allowed_in_if_header() {
        let stmts = parse_body("if x == y {\n}");
        match &stmts[0] {
            Stmt::If(stmt) => assert!(matches!(stmt.cond, Expr::Binary(_))),
            other => panic!("expected an if statement, got {other:?}"),
        }
    }

    #[test]
    fn test_composite_literal_in_parens_inside_header() {
        let stmts = parse_body("if p == (Point{}) {\n}");
        assert!(matches!(stmts[0], Stmt::If(_)));
    }

    #[test]
    fn test_range_and_define() {
        let stmts = parse_body("for i, v := range items {\n\t_ = i + v\n}");
        match &stmts[0] {
            Stmt::Range(range) => {
                assert_eq!(range.op, AssignOp::Define);
                assert!(range.value.is_some());
            }
            other => panic!("expected a range loop, got {other:?}"),
        }
    }

    #[test]
    fn test_switch_and_type_switch() {
        let stmts = parse_body(
            "switch x := v.(type) {\ncase int, string:\ndefault:\n}\nswitch {\ncase a > b:\n\tfallthrough\ncase a < b:\n}",
        );
        match &stmts[0] {
            Stmt::TypeSwitch(switch) => {
                assert_eq!(switch.clauses.len(), 2);
                assert_eq!(switch.clauses[0].list.as_ref().map(Vec::len), Some(2));
                assert!(switch.clauses[1].list.is_none());
            }
            other => panic!("expected a type switch, got {other:?}"),
        }
        assert!(matches!(&stmts[1], Stmt::Switch(s) if s.tag.is_none() && s.clauses.len() == 2));
    }

    #[test]
    fn test_select_go_defer_and_labels() {
        let stmts = parse_body(
            "go worker(ch)\ndefer close(ch)\nloop:\n\tselect {\n\tcase v := <-ch:\n\t\t_ = v\n\tcase ch <- 1:\n\tdefault:\n\t\tbreak loop\n\t}",
        );
        assert!(matches!(stmts[0], Stmt::Go(_)));
        assert!(matches!(stmts[1], Stmt::Defer(_)));
        match &stmts[2] {
            Stmt::Labeled(labeled) => {
                assert_eq!(labeled.label.name, "loop");
                assert!(matches!(&*labeled.stmt, Stmt::Select(s) if s.clauses.len() == 3));
            }
            other => panic!("expected a labeled statement, got {other:?}"),
        }
    }

    #[test]
    fn test_func_literal_and_channel_types() {
        let stmts = parse_body("var ch <-chan int\nf := func(x int) bool { return x > 0 }\n_, _ = ch, f");
        assert_eq!(stmts.len(), 3);
        match &stmts[0] {
            Stmt::Decl(decl) => match &decl.specs[0] {
                Spec::Value(spec) => {
                    assert!(matches!(&spec.ty, Some(Expr::ChanType(c)) if c.dir == ChanDir::Recv))
                }
                other => panic!("expected a value spec, got {other:?}"),
            },
            other => panic!("expected a declaration, got {other:?}"),
        }
        assert!(matches!(&stmts[1], Stmt::Assign(a) if matches!(a.rhs[0], Expr::FuncLit(_))));
    }

    #[test]
    fn test_struct_tags_and_embedded_fields() {
        let file = assert_parse_success(
            "package p\ntype T struct {\n\tio.Reader\n\tName string `json:\"name\"`\n}\n",
        );
        match &file.decls[0] {
            Decl::Gen(gen) => match &gen.specs[0] {
                Spec::Type(spec) => match &spec.ty {
                    Expr::StructType(st) => {
                        assert!(st.fields.fields[0].names.is_empty());
                        assert_eq!(st.fields.fields[1].tag.as_deref(), Some("`json:\"name\"`"));
                    }
                    other => panic!("expected a struct, got {other:?}"),
                },
                other => panic!("expected a type spec, got {other:?}"),
            },
            other => panic!("expected a type declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_attach_to_declarations() {
        let file = assert_parse_success(
            "package p\n\n// F does things.\nfunc F() {} // trailing\n\n// dangling\n",
        );
        let func = match &file.decls[0] {
            Decl::Func(func) => func,
            other => panic!("expected a function, got {other:?}"),
        };
        assert_eq!(func.doc[0].text, "// F does things.");
        assert_eq!(func.comment.as_ref().map(|c| c.text.as_str()), Some("// trailing"));
        assert_eq!(file.trailing[0].text, "// dangling");
    }

    #[test_case("package"; "missing package name")]
    #[test_case("package p\nfunc {"; "missing function name")]
    #[test_case("package p\nvar x = (1 + \n"; "unbalanced parens")]
    #[test_case("func main() {}"; "missing package clause")]
    fn test_parse_errors(source: &str) {
        let result: Result<File, ParseError> = parse_source(source);
        assert!(result.is_err(), "Parsing should fail");
    }

    #[test]
    fn test_error_span_points_into_source() {
        let source = "package p\n\nfunc f() {\n\tx := \n}\n";
        let err = parse_source(source).unwrap_err();
        assert!(err.span().start >= source.find("x :=").unwrap());
    }
}
