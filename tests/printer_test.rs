//! プリンターテスト
//!
//! 構文木から gofmt と同じ形のソースが出力されることを確認する。

#[cfg(test)]
mod tests {
    use gocat::parser::parse_source;
    use gocat::printer::{print_decl, print_file};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn format(source: &str) -> String {
        print_file(&parse_source(source).expect("Parsing should succeed"))
    }

    const CANONICAL: &str = r#"// Package shapes computes areas.
package shapes

import (
	"fmt"
	"math"
)

// Kind of a shape.
type Kind int

const (
	Circle Kind = iota // round
	Square             // four sides
)

// Shape is anything with an area.
type Shape interface {
	Area() float64
}

type Rect struct {
	W, H  float64 `json:"w"`
	Label string
}

func (r Rect) Area() float64 { return r.W * r.H }

var names = map[Kind]string{
	Circle: "circle",
	Square: "square",
}

func Describe(s Shape) string {
	switch v := s.(type) {
	case Rect:
		if v.W == v.H {
			return "square"
		}
	default:
		_ = v
	}
	total := 0.0
	for i := 0; i < 3; i++ {
		total += math.Sqrt(float64(i))
	}
	return fmt.Sprintf("%v %.2f", s, total)
}
"#;

    #[test]
    fn test_canonical_file_is_unchanged() {
        assert_eq!(format(CANONICAL), CANONICAL);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let once = format("package p\nfunc f(){\nx:=a+b*c\nif(x>1){return}\n}\n");
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_spacing_and_blank_lines_are_normalized() {
        let source = "package p\nfunc f(){\nx:=a+b*c\n\n\n\nif(x>1){return}\n}\n";
        assert_eq!(
            format(source),
            "package p\n\nfunc f() {\n\tx := a + b*c\n\n\tif x > 1 {\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn test_struct_comments_align() {
        let source = "package p\n\ntype Config struct {\n\tName string // display name\n\tRetries int // attempts\n}\n";
        assert_eq!(
            format(source),
            "package p\n\ntype Config struct {\n\tName    string // display name\n\tRetries int    // attempts\n}\n"
        );
    }

    #[test]
    fn test_blank_line_between_different_decl_kinds() {
        let source = "package p\nvar a = 1\nvar b = 2\nconst c = 3\n";
        assert_eq!(
            format(source),
            "package p\n\nvar a = 1\nvar b = 2\n\nconst c = 3\n"
        );
    }

    #[test_case("x[a:b]"; "slice")]
    #[test_case("x.(T)"; "type assertion")]
    #[test_case("[]string{\"a\", \"b\"}"; "slice literal")]
    #[test_case("func() {}"; "empty func literal")]
    #[test_case("make(chan<- int, 1)"; "send channel")]
    #[test_case("append(xs, ys...)"; "variadic call")]
    #[test_case("x &^ y"; "and not")]
    fn test_expressions_are_stable(expr: &str) {
        let source = format!("package p\n\nvar _ = {expr}\n");
        assert_eq!(format(&source), source);
    }

    #[test]
    fn test_print_single_decl() {
        let file = parse_source("package p\nfunc  Add(a,b int)int{return a+b}\n").unwrap();
        assert_eq!(print_decl(&file.decls[0]), "func Add(a, b int) int { return a + b }\n");
    }

    #[test]
    fn test_output_reparses() {
        let out = format(CANONICAL);
        assert!(parse_source(&out).is_ok());
    }
}
