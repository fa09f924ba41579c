/// glob style key patterns used by `delete_pattern`.
///
/// `:` separates key segments.
///
/// * `**` matches any sequence, across separators
/// * `*` matches any sequence within one segment
/// * `?` matches a single character within one segment
///
/// everything else is literal and the pattern is anchored at both ends.
///
use crate::error::{AdapterError, Result};
use regex::Regex;

pub const SEPARATOR: char = ':';

#[derive(Debug, Clone)]
pub struct KeyPattern {
    glob: String,
    regex: Regex,
}

impl KeyPattern {
    pub fn new(glob: &str) -> Result<KeyPattern> {
        KeyPattern::with_prefix("", glob)
    }

    /// a pattern under a namespace; wildcard characters in `prefix` match only themselves
    pub fn with_prefix(prefix: &str, glob: &str) -> Result<KeyPattern> {
        let full = format!("{}{}", prefix, glob);
        let source = translate_with_prefix(prefix, glob);
        let regex = Regex::new(&source).map_err(|e| AdapterError::InvalidPattern {
            pattern: full.clone(),
            reason: e.to_string(),
        })?;

        Ok(KeyPattern { glob: full, regex })
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// translate a glob into an anchored regular expression
pub fn translate(glob: &str) -> String {
    translate_with_prefix("", glob)
}

/// as `translate`, with a literal prefix ahead of the glob
pub fn translate_with_prefix(prefix: &str, glob: &str) -> String {
    let not_sep = format!("[^{}]", regex::escape(&SEPARATOR.to_string()));
    let mut source = format!("^{}", regex::escape(prefix));
    let mut literal = String::new();
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' | '?' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();

                if c == '?' {
                    source.push_str(&not_sep);
                } else if chars.peek() == Some(&'*') {
                    chars.next();
                    source.push_str(".*");
                } else {
                    source.push_str(&not_sep);
                    source.push('*');
                }
            }
            _ => literal.push(c),
        }
    }

    source.push_str(&regex::escape(&literal));
    source.push('$');

    source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(glob: &str, key: &str) -> bool {
        KeyPattern::new(glob).expect("pattern should compile").is_match(key)
    }

    #[test]
    fn translation() {
        assert_eq!(translate("foo"), "^foo$");
        assert_eq!(translate("foo:*"), "^foo:[^:]*$");
        assert_eq!(translate("foo:**:bar"), "^foo:.*:bar$");
        assert_eq!(translate("a.?"), r"^a\.[^:]$");
    }

    #[test]
    fn single_star_stays_in_segment() {
        assert!(matches("foo:*", "foo:bar"));
        assert!(matches("foo:*", "foo:"));
        assert!(!matches("foo:*", "foo:bar:baz"));
        assert!(matches("*:bar", "foo:bar"));
        assert!(!matches("*:bar", "x:foo:bar"));
    }

    #[test]
    fn double_star_crosses_segments() {
        assert!(matches("foo:**", "foo:bar"));
        assert!(matches("foo:**", "foo:bar:baz"));
        assert!(matches("foo:**:bar", "foo:a:b:bar"));
        assert!(matches("foo:**:bar", "foo:a:bar"));
        assert!(!matches("foo:**:bar", "foo:bar"));
        assert!(matches("**", "anything:at:all"));
    }

    #[test]
    fn prefix_is_literal() {
        assert_eq!(translate_with_prefix("a?:", "*"), r"^a\?:[^:]*$");

        let pattern = KeyPattern::with_prefix("a?:", "**").unwrap();
        assert_eq!(pattern.glob(), "a?:**");
        assert!(pattern.is_match("a?:mine"));
        assert!(!pattern.is_match("ab:other"));

        let pattern = KeyPattern::with_prefix("*.", "x").unwrap();
        assert!(pattern.is_match("*.x"));
        assert!(!pattern.is_match("ns.x"));
    }

    #[test]
    fn question_mark_and_literals() {
        assert!(matches("user.?", "user.1"));
        assert!(!matches("user.?", "user.12"));
        assert!(!matches("user.?", "userx1"));
        assert!(!matches("a?b", "a:b"));
        assert!(matches("cost+(1)", "cost+(1)"));
        assert!(!matches("foo", "foobar"));
        assert!(!matches("foo", "xfoo"));
    }
}
