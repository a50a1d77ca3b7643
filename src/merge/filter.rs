//! 入力ファイルの選別

use std::path::Path;

/// Go のテストファイル名の規則
const TEST_SUFFIX: &str = "_test.go";

/// ファイル名が `_test.go` で終わるか
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(TEST_SUFFIX))
}

/// 結合対象にするファイルを決める
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFilter {
    pub skip_tests: bool,
}

impl FileFilter {
    pub fn new(skip_tests: bool) -> Self {
        Self { skip_tests }
    }

    pub fn is_eligible(&self, path: &Path) -> bool {
        !(self.skip_tests && is_test_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a_test.go", true; "test file")]
    #[test_case("dir/b_test.go", true; "nested test file")]
    #[test_case("a.go", false; "plain file")]
    #[test_case("test.go", false; "name without underscore")]
    #[test_case("a_test.go.orig", false; "other extension")]
    fn test_is_test_file(path: &str, expected: bool) {
        assert_eq!(is_test_file(Path::new(path)), expected);
    }

    #[test]
    fn test_filter_keeps_tests_unless_asked() {
        let path = Path::new("x_test.go");
        assert!(FileFilter::new(false).is_eligible(path));
        assert!(!FileFilter::new(true).is_eligible(path));
    }
}
