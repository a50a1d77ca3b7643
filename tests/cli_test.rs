//! コマンドラインテスト
//!
//! ビルドした `gocat` バイナリを実行し、出力先・終了コード・入力ファイルの削除を確認する。

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use std::process::{Command, Output};
    use tempfile::TempDir;

    const FILE_A: &str = "package demo\n\nfunc Foo() int { return 1 }\n";
    const FILE_B: &str = "package demo\n\nfunc Bar() int { return Foo() + 1 }\n";

    fn gocat(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gocat"))
            .args(args)
            .output()
            .expect("failed to run gocat")
    }

    fn setup(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let paths = files
            .iter()
            .map(|(name, text)| {
                let path = dir.path().join(name);
                fs::write(&path, text).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    fn path_str(path: &PathBuf) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn test_writes_to_stdout() {
        let (_dir, paths) = setup(&[("a.go", FILE_A), ("b.go", FILE_B)]);
        let output = gocat(&["-x", "x", path_str(&paths[0]), path_str(&paths[1])]);
        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "package demo\n\nfunc xFoo() int { return 1 }\n\nfunc xBar() int { return xFoo() + 1 }\n"
        );
    }

    #[test]
    fn test_writes_to_output_file_and_removes_inputs() {
        let (dir, paths) = setup(&[("a.go", FILE_A), ("b.go", FILE_B)]);
        let out = dir.path().join("bundle.go");
        let output = gocat(&[
            "-p",
            "bundle",
            "-k",
            "-o",
            path_str(&out),
            path_str(&paths[0]),
            path_str(&paths[1]),
        ]);
        assert!(output.status.success());
        assert!(output.stdout.is_empty());
        let merged = fs::read_to_string(&out).unwrap();
        assert!(merged.starts_with("package bundle\n"));
        assert!(!paths[0].exists());
        assert!(!paths[1].exists());
    }

    #[test]
    fn test_failure_keeps_inputs_and_exits_non_zero() {
        let (dir, paths) = setup(&[
            ("a.go", FILE_A),
            ("b.go", "package demo\n\nimport f \"fmt\"\n\nvar _ = f.Sprint\n"),
        ]);
        let out = dir.path().join("bundle.go");
        let output = gocat(&["-k", "-o", path_str(&out), path_str(&paths[0]), path_str(&paths[1])]);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("fmt"));
        assert!(!out.exists());
        assert!(paths[0].exists());
        assert!(paths[1].exists());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let (_dir, paths) = setup(&[("bad.go", "package demo\n\nfunc (\n")]);
        let output = gocat(&[path_str(&paths[0])]);
        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("bad.go"));
    }

    #[test]
    fn test_skip_tests_and_strip_comments_flags() {
        let (_dir, paths) = setup(&[
            ("a.go", "package demo\n\n// Foo is documented.\nfunc Foo() {}\n"),
            ("a_test.go", "package demo\n\nfunc TestFoo() {}\n"),
        ]);
        let output = gocat(&["-c", "-n", path_str(&paths[0]), path_str(&paths[1])]);
        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "package demo\n\nfunc Foo() {}\n"
        );
    }

    #[test]
    fn test_requires_input_files() {
        let output = gocat(&[]);
        assert!(!output.status.success());
    }
}
