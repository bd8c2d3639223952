//! Case-insensitive glob patterns over flat strings.
//!
//! Supported syntax:
//!
//! | Syntax      | Meaning                                          |
//! |-------------|--------------------------------------------------|
//! | `*`         | any run of characters, including none and `/`    |
//! | `?`         | exactly one character                            |
//! | `[abc]`     | one character from the set                       |
//! | `[a-z]`     | one character from the range                     |
//! | `[!a]` `[^a]` | one character not in the set                   |
//! | `\x`        | the literal character `x`                        |
//!
//! Braces, a leading `!` and `**` carry no special meaning: braces and `!`
//! are literals and `**` behaves like `*`. An unterminated `[` is a literal.
//! The whole candidate must match.

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Single(char),
    Range(char, char),
}

impl ClassItem {
    fn contains(&self, c: char) -> bool {
        match *self {
            ClassItem::Single(s) => s == c,
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CharClass {
    negated: bool,
    items: Vec<ClassItem>,
}

impl CharClass {
    fn matches(&self, c: char) -> bool {
        let hit = [c, fold(c), unfold(c)]
            .iter()
            .any(|&v| self.items.iter().any(|item| item.contains(v)));
        hit != self.negated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Already case-folded.
    Literal(char),
    AnyChar,
    AnyRun,
    Class(CharClass),
}

impl Token {
    fn matches_char(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => fold(c) == *l,
            Token::AnyChar => true,
            Token::AnyRun => false,
            Token::Class(class) => class.matches(c),
        }
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn unfold(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile `source`. Compilation never fails: malformed constructs fall
    /// back to literal characters.
    pub fn compile(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut tokens = Vec::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\\' => match chars.get(i + 1) {
                    Some(&next) => {
                        tokens.push(Token::Literal(fold(next)));
                        i += 2;
                    }
                    None => {
                        tokens.push(Token::Literal('\\'));
                        i += 1;
                    }
                },
                '*' => {
                    // Consecutive stars collapse; there is no globstar.
                    if tokens.last() != Some(&Token::AnyRun) {
                        tokens.push(Token::AnyRun);
                    }
                    i += 1;
                }
                '?' => {
                    tokens.push(Token::AnyChar);
                    i += 1;
                }
                '[' => match parse_class(&chars, i + 1) {
                    Some((class, next)) => {
                        tokens.push(Token::Class(class));
                        i = next;
                    }
                    None => {
                        tokens.push(Token::Literal('['));
                        i += 1;
                    }
                },
                c => {
                    tokens.push(Token::Literal(fold(c)));
                    i += 1;
                }
            }
        }

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Return true if the pattern contains no wildcard or class.
    pub fn is_literal(&self) -> bool {
        self.tokens.iter().all(|t| matches!(t, Token::Literal(_)))
    }

    /// Return true if `candidate` matches the whole pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        let text: Vec<char> = candidate.chars().collect();
        let (mut p, mut t) = (0, 0);
        // (token index of the last `*`, text index it is currently absorbing up to)
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match self.tokens.get(p) {
                Some(Token::AnyRun) => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                Some(token) if token.matches_char(text[t]) => {
                    p += 1;
                    t += 1;
                    continue;
                }
                _ => {}
            }

            match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            }
        }

        self.tokens[p..].iter().all(|t| *t == Token::AnyRun)
    }
}

/// Parse a character class whose body starts at `start` (just after `[`).
///
/// Returns the class and the index after the closing `]`, or `None` when the
/// class is unterminated. A `]` directly after `[` or `[!` is a member.
fn parse_class(chars: &[char], start: usize) -> Option<(CharClass, usize)> {
    let mut i = start;
    let negated = matches!(chars.get(i), Some(&'!') | Some(&'^'));
    if negated {
        i += 1;
    }

    let mut items = Vec::new();
    let mut first = true;

    loop {
        let c = *chars.get(i)?;
        if c == ']' && !first {
            return Some((CharClass { negated, items }, i + 1));
        }
        first = false;

        let (lo, next) = if c == '\\' {
            (*chars.get(i + 1)?, i + 2)
        } else {
            (c, i + 1)
        };

        let range_end = chars
            .get(next + 1)
            .copied()
            .filter(|_| chars.get(next) == Some(&'-'))
            .filter(|&end| end != ']');

        match range_end {
            Some(end) => {
                let (hi, after) = if end == '\\' {
                    (*chars.get(next + 2)?, next + 3)
                } else {
                    (end, next + 2)
                };
                items.push(ClassItem::Range(lo, hi));
                i = after;
            }
            None => {
                items.push(ClassItem::Single(lo));
                i = next;
            }
        }
    }
}

/// Compile `pattern` and test `candidate` against it.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    Pattern::compile(pattern).matches(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_anchored_and_case_insensitive() {
        assert!(matches("users", "users"));
        assert!(matches("users", "USERS"));
        assert!(matches("USERS", "users"));
        assert!(!matches("users", "users2"));
        assert!(!matches("users", "user"));
        assert!(!matches("users", ""));
        assert!(Pattern::compile("users").is_literal());
    }

    #[test]
    fn star_matches_any_run() {
        assert!(matches("*", ""));
        assert!(matches("*", "anything/with/slashes"));
        assert!(matches("oci_repos*", "oci_repos"));
        assert!(matches("oci_repos*", "oci_repos_42"));
        assert!(matches("*:read", "users:read"));
        assert!(matches("a*b*c", "aXXbYYbZZc"));
        assert!(!matches("a*b*c", "aXXbYY"));
        assert!(!Pattern::compile("a*").is_literal());
    }

    #[test]
    fn double_star_is_plain_star() {
        assert_eq!(Pattern::compile("a**b").tokens, Pattern::compile("a*b").tokens);
        assert!(matches("**", "x/y/z"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(matches("user?", "users"));
        assert!(!matches("user?", "user"));
        assert!(!matches("user?", "userss"));
        assert!(matches("?", "é"));
    }

    #[test]
    fn classes_and_ranges() {
        assert!(matches("users:[0-9]", "users:7"));
        assert!(!matches("users:[0-9]", "users:x"));
        assert!(matches("[abc]x", "bx"));
        assert!(matches("[a-c]x", "BX"));
        assert!(matches("[A-C]x", "bx"));
        assert!(matches("[!a-c]x", "dx"));
        assert!(!matches("[!a-c]x", "ax"));
        assert!(matches("[^a]", "b"));
        assert!(matches("[]]", "]"));
        assert!(matches("[a-]", "-"));
    }

    #[test]
    fn unterminated_class_is_literal() {
        assert!(matches("[abc", "[abc"));
        assert!(!matches("[abc", "a"));
    }

    #[test]
    fn braces_and_leading_bang_are_literal() {
        assert!(matches("{a,b}", "{a,b}"));
        assert!(!matches("{a,b}", "a"));
        assert!(matches("!users", "!users"));
        assert!(!matches("!users", "groups"));
    }

    #[test]
    fn backslash_escapes() {
        assert!(matches(r"a\*", "a*"));
        assert!(!matches(r"a\*", "ab"));
        assert!(matches(r"a\?", "a?"));
        assert!(matches(r"trailing\", r"trailing\"));
    }

    #[test]
    fn source_is_preserved() {
        assert_eq!(Pattern::compile("Oci_*").as_str(), "Oci_*");
    }
}
