use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// A single reference found in an import directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    pub source: String,
    pub kind: ImportKind,
    /// 1-based line of the directive in the importing file
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Import,
    Use,
    Forward,
}

/// Stylesheet syntax, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Scss,
    /// The whitespace-sensitive `.sass` syntax
    Indented,
}

impl Syntax {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("sass") => Syntax::Indented,
            _ => Syntax::Scss,
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directive keyword at the start of a statement
fn directive_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"@(import|use|forward)\b").unwrap())
}

/// Items inside a directive: `url(...)` or a quoted string
fn item_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"url\([^)]*\)|"([^"]*)"|'([^']*)'"#).unwrap())
}

/// Read a stylesheet and extract its import directives in source order
pub fn extract_imports(path: &Path) -> Result<Vec<ImportInfo>, ParseError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ParseError::Io { path: path.to_path_buf(), source })?;
    Ok(scan_imports(&content, Syntax::from_path(path)))
}

/// Extract file imports from stylesheet text.
///
/// Built-in modules (`sass:*`) and plain CSS imports are left out since they
/// never map to a stylesheet on disk.
pub fn scan_imports(content: &str, syntax: Syntax) -> Vec<ImportInfo> {
    let Masked { code, masked } = mask(content, syntax);
    let mut imports = Vec::new();

    // Directives and terminators are searched where strings are blanked, so
    // `content: "@import 'x'"` is not a directive
    for m in directive_regex().captures_iter(&masked) {
        let (Some(whole), Some(keyword)) = (m.get(0), m.get(1)) else {
            continue;
        };
        let kind = match keyword.as_str() {
            "use" => ImportKind::Use,
            "forward" => ImportKind::Forward,
            _ => ImportKind::Import,
        };
        let line = masked[..whole.start()].matches('\n').count() + 1;
        let end = whole.end() + statement_len(&masked[whole.end()..], syntax);
        let statement = &code[whole.end()..end];

        if kind == ImportKind::Import && has_media_query(statement, syntax) {
            continue;
        }

        let mut sources = references(statement, syntax);
        if kind != ImportKind::Import {
            // `@use "x" with (...)` and `@forward "x" as y-*` name one module
            sources.truncate(1);
        }

        for source in sources {
            if is_builtin(&source) || is_plain_css(&source) {
                continue;
            }
            imports.push(ImportInfo { source, kind, line });
        }
    }

    imports
}

/// Length of a statement after its keyword, up to its terminator
fn statement_len(rest: &str, syntax: Syntax) -> usize {
    let end = match syntax {
        Syntax::Scss => rest.find([';', '{', '}']),
        Syntax::Indented => rest.find([';', '\n']),
    };
    end.unwrap_or(rest.len())
}

fn is_unquoted(statement: &str) -> bool {
    !statement.contains(['"', '\'']) && !statement.contains("url(")
}

fn references(statement: &str, syntax: Syntax) -> Vec<String> {
    if syntax == Syntax::Indented && is_unquoted(statement) {
        return statement
            .split(',')
            .filter_map(|item| item.split_whitespace().next())
            .map(str::to_string)
            .collect();
    }

    item_regex()
        .captures_iter(statement)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `@import "x" screen and (...)` is passed through as plain CSS
fn has_media_query(statement: &str, syntax: Syntax) -> bool {
    if syntax == Syntax::Indented && is_unquoted(statement) {
        return statement.split(',').any(|item| item.split_whitespace().nth(1).is_some());
    }

    item_regex().replace_all(statement, "").chars().any(|c| c != ',' && !c.is_whitespace())
}

fn is_builtin(source: &str) -> bool {
    source.starts_with("sass:")
}

fn is_plain_css(source: &str) -> bool {
    source.ends_with(".css")
        || source.starts_with("http://")
        || source.starts_with("https://")
        || source.starts_with("//")
}

/// Two views of a stylesheet with identical byte offsets and newlines:
/// `code` has comments blanked, `masked` additionally blanks string contents.
struct Masked {
    code: String,
    masked: String,
}

/// Blank comments (and, in `masked`, string contents).
///
/// `url(...)` is kept as is since it may contain `//`. Only ASCII bytes are
/// ever replaced, with spaces, so both buffers stay valid UTF-8.
fn mask(content: &str, syntax: Syntax) -> Masked {
    let src = content.as_bytes();
    let mut code = src.to_vec();
    let mut masked = src.to_vec();
    let mut i = 0;

    while i < src.len() {
        match src[i] {
            quote @ (b'"' | b'\'') => {
                let start = i + 1;
                let mut end = start;
                while end < src.len() && src[end] != quote && src[end] != b'\n' {
                    if src[end] == b'\\' {
                        end += 1;
                    }
                    end += 1;
                }
                let end = end.min(src.len());
                blank(&mut masked[start..end]);
                i = end + 1;
            }
            b'u' if src[i..].starts_with(b"url(") => {
                let close = src[i..].iter().position(|&b| b == b')' || b == b'\n');
                i = close.map_or(src.len(), |offset| i + offset + 1);
            }
            b'/' if matches!(src.get(i + 1), Some(b'/' | b'*')) => {
                let end = comment_end(src, i, syntax);
                blank(&mut code[i..end]);
                blank(&mut masked[i..end]);
                i = end;
            }
            _ => i += 1,
        }
    }

    Masked {
        code: String::from_utf8_lossy(&code).into_owned(),
        masked: String::from_utf8_lossy(&masked).into_owned(),
    }
}

/// End offset (exclusive) of the comment starting at `start`
fn comment_end(src: &[u8], start: usize, syntax: Syntax) -> usize {
    let line_end = |from: usize| {
        src[from..].iter().position(|&b| b == b'\n').map_or(src.len(), |offset| from + offset)
    };

    match syntax {
        Syntax::Scss if src[start + 1] == b'/' => line_end(start),
        Syntax::Scss => src[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map_or(src.len(), |offset| start + 2 + offset + 2),
        Syntax::Indented => {
            // The comment owns every following line indented deeper than the
            // line it starts on
            let line_start = src[..start].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
            let base = indentation(&src[line_start..]);
            let mut end = line_end(start);
            if line_start + base != start {
                // Trailing comment after code on the same line
                return end;
            }

            while end < src.len() {
                let next = end + 1;
                let next_end = line_end(next);
                let line = &src[next..next_end];
                let blank_line = line.iter().all(u8::is_ascii_whitespace);
                if !blank_line && indentation(line) <= base {
                    break;
                }
                end = next_end;
            }
            end
        }
    }
}

fn indentation(line: &[u8]) -> usize {
    line.iter().take_while(|&&b| b == b' ' || b == b'\t').count()
}

fn blank(bytes: &mut [u8]) {
    for b in bytes.iter_mut().filter(|b| **b != b'\n') {
        *b = b' ';
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(imports: &[ImportInfo]) -> Vec<&str> {
        imports.iter().map(|i| i.source.as_str()).collect()
    }

    #[test]
    fn test_import_statements() {
        let content = r#"
@import './base';
@import "utilities";
"#;
        let imports = scan_imports(content, Syntax::Scss);

        assert_eq!(sources(&imports), vec!["./base", "utilities"]);
        assert!(imports.iter().all(|i| i.kind == ImportKind::Import));
        assert_eq!(imports[0].line, 2);
        assert_eq!(imports[1].line, 3);
    }

    #[test]
    fn test_import_list_keeps_order() {
        let content = "@import \"thingy\", 'otherthingy';\n@import\n  \"a\",\n  \"b\";";
        let imports = scan_imports(content, Syntax::Scss);

        assert_eq!(sources(&imports), vec!["thingy", "otherthingy", "a", "b"]);
        assert_eq!(imports[2].line, 2);
    }

    #[test]
    fn test_use_and_forward_take_first_reference() {
        let content = r#"
@use "config" with ($primary: "blue");
@forward './helpers' as helper-*;
"#;
        let imports = scan_imports(content, Syntax::Scss);

        assert_eq!(sources(&imports), vec!["config", "./helpers"]);
        assert_eq!(imports[0].kind, ImportKind::Use);
        assert_eq!(imports[1].kind, ImportKind::Forward);
    }

    #[test]
    fn test_skips_builtin_modules() {
        let content = r#"
@use 'sass:math';
@use "sass:color";
@use './variables';
"#;
        let imports = scan_imports(content, Syntax::Scss);
        assert_eq!(sources(&imports), vec!["./variables"]);
    }

    #[test]
    fn test_skips_plain_css_imports() {
        let content = r#"
@import url(http://fonts.example.com/font.css);
@import url("theme");
@import "reset.css";
@import "https://cdn.example.com/lib";
@import "//cdn.example.com/lib";
@import "landscape" screen and (orientation: landscape);
@import "real";
"#;
        let imports = scan_imports(content, Syntax::Scss);
        assert_eq!(sources(&imports), vec!["real"]);
        assert_eq!(imports[0].line, 8);
    }

    #[test]
    fn test_media_query_import_in_indented_syntax() {
        let content = "@import theme screen\n@import kept\n";
        let imports = scan_imports(content, Syntax::Indented);
        assert_eq!(sources(&imports), vec!["kept"]);
    }

    #[test]
    fn test_directive_inside_string_is_not_an_import() {
        let content = r#".a::before { content: "@import 'nope'"; }
.b::after { content: '@use "also-nope"'; }
@import "real";
"#;
        let imports = scan_imports(content, Syntax::Scss);

        assert_eq!(sources(&imports), vec!["real"]);
        assert_eq!(imports[0].line, 3);
    }

    #[test]
    fn test_terminator_inside_reference_string() {
        let content = "@import \"odd;name\", 'other';";
        let imports = scan_imports(content, Syntax::Scss);
        assert_eq!(sources(&imports), vec!["odd;name", "other"]);
    }

    #[test]
    fn test_indented_comment_spans_nested_lines() {
        let content = "/* a\n  @import nope\n\n  // @import nope-either\n.a\n  b: c\n@import kept\n";
        let imports = scan_imports(content, Syntax::Indented);

        assert_eq!(sources(&imports), vec!["kept"]);
        assert_eq!(imports[0].line, 7);
    }

    #[test]
    fn test_indented_line_comment_spans_nested_lines() {
        let content = ".a\n  // note\n    @import nope\n  @import kept\n";
        let imports = scan_imports(content, Syntax::Indented);
        assert_eq!(sources(&imports), vec!["kept"]);
    }

    #[test]
    fn test_indented_trailing_comment_stays_on_its_line() {
        let content = ".a // note\n  @import kept\n";
        let imports = scan_imports(content, Syntax::Indented);
        assert_eq!(sources(&imports), vec!["kept"]);
    }

    #[test]
    fn test_ignores_commented_imports() {
        let content = r#"
// @import "line-comment";
/* @import "block-comment";
   @import "still-comment"; */
@import "kept"; // @import "trailing";
"#;
        let imports = scan_imports(content, Syntax::Scss);

        assert_eq!(sources(&imports), vec!["kept"]);
        assert_eq!(imports[0].line, 5);
    }

    #[test]
    fn test_double_slash_inside_string_is_not_a_comment() {
        let content = ".a { background: \"//not-a-comment\"; }\n@import \"after\";";
        let imports = scan_imports(content, Syntax::Scss);
        assert_eq!(sources(&imports), vec!["after"]);
    }

    #[test]
    fn test_indented_syntax_unquoted() {
        let content = "@import base, mixins\n@use \"config\"\n.a\n  color: red\n";
        let imports = scan_imports(content, Syntax::Indented);

        assert_eq!(sources(&imports), vec!["base", "mixins", "config"]);
        assert_eq!(imports[2].line, 2);
    }

    #[test]
    fn test_syntax_from_path() {
        assert_eq!(Syntax::from_path(Path::new("a/b.sass")), Syntax::Indented);
        assert_eq!(Syntax::from_path(Path::new("a/b.scss")), Syntax::Scss);
        assert_eq!(Syntax::from_path(Path::new("a/b.css.scss")), Syntax::Scss);
    }

    #[test]
    fn test_empty_content() {
        assert!(scan_imports("", Syntax::Scss).is_empty());
    }

    #[test]
    fn test_css_only() {
        let content = r#"
.button {
    color: red;
}
"#;
        assert!(scan_imports(content, Syntax::Scss).is_empty());
    }

    #[test]
    fn test_extract_imports_missing_file() {
        let err = extract_imports(Path::new("/definitely/not/here.scss")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.scss"));
    }
}
