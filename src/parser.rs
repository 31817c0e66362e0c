// parser.rs

const DELIMITERS: [char; 4] = [' ', '\t', '\r', '\n'];

/// Splits a command line on runs of spaces, tabs and line terminators.
/// Quotes and backslashes are ordinary characters.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_have_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("\t\n").is_empty());
        assert!(tokenize("\r\n").is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(tokenize("  a   b "), vec!["a", "b"]);
        assert_eq!(tokenize("ls -l /tmp\n"), vec!["ls", "-l", "/tmp"]);
        assert_eq!(tokenize("\tcd\t..\r\n"), vec!["cd", ".."]);
    }

    #[test]
    fn quotes_and_escapes_are_literal() {
        assert_eq!(
            tokenize(r#"echo "hello world" it\'s"#),
            vec!["echo", "\"hello", "world\"", "it\\'s"]
        );
    }
}
