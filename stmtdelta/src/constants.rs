use regex::Regex;
use std::sync::OnceLock;

/// Name of the per-project configuration file.
pub const CONFIG_FILENAME: &str = ".stmtdelta.toml";

/// Name of this transformation as reported to the reduction driver.
pub const TRANSFORMATION_NAME: &str = "remove-stmt";

/// Line printed in answer to `--query-instances`.
pub const INSTANCES_PREFIX: &str = "Available transformation instances:";

/// Longest snippet shown per candidate in `--list-instances`.
pub const SNIPPET_WIDTH: usize = 48;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "stmtdelta=warn";

/// Tracing filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "stmtdelta=debug";

/// Regex for preprocessor line markers (`# 12 "foo.h" 1` or `#line 12 "foo.h"`).
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn line_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r#"^[ \t]*#[ \t]*(?:line[ \t]+)?(?P<line>\d+)[ \t]+"(?P<file>[^"]*)""#)
            .expect("Invalid line marker regex pattern")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_marker_forms() {
        let re = line_marker_re();
        let caps = re.captures("# 1 \"foo.h\" 1 3 4\n").unwrap();
        assert_eq!(&caps["file"], "foo.h");
        assert_eq!(&caps["line"], "1");

        let caps = re.captures("#line 20 \"bar.c\"\n").unwrap();
        assert_eq!(&caps["file"], "bar.c");

        assert!(re.captures("#include \"foo.h\"\n").is_none());
        assert!(re.captures("#define X 1\n").is_none());
        assert!(re.captures("x = 1; # 2 \"no\"\n").is_none());
    }
}
