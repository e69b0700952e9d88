//! Object-list expressions.
//!
//! Object arguments are written as plain names (`clk`), braced lists
//! (`{a b}`, already unwrapped by the tokenizer) or object queries
//! (`[get_ports {din[*]}]`). [`ObjectList::parse`] decomposes an argument
//! into object names where that is possible without evaluating it.

/// Query flags that take a value.
const VALUED_QUERY_FLAGS: &[&str] = &["-filter", "-of_objects"];

/// A decomposed object argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectList {
    /// `[get_* pattern...]`.
    Query {
        command: String,
        patterns: Vec<String>,
        /// Whether any pattern word was written, even an empty `{}`.
        explicit: bool,
    },
    /// Plain object names.
    Names(Vec<String>),
    /// An expression whose objects are not statically known.
    Opaque,
}

impl ObjectList {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();

        if trimmed.starts_with('[')
            && matching(trimmed.as_bytes(), 0, b'[', b']') + 1 == trimmed.len()
        {
            return Self::parse_query(&trimmed[1..trimmed.len() - 1]);
        }

        let words = split_words(trimmed);
        if words.iter().any(Word::is_expression) {
            return Self::Opaque;
        }
        let names = words
            .into_iter()
            .flat_map(|word| word.text.split_whitespace())
            .map(str::to_string)
            .collect();
        Self::Names(names)
    }

    fn parse_query(inner: &str) -> Self {
        let words = split_words(inner);
        let Some((command, args)) = words.split_first() else {
            return Self::Opaque;
        };
        if command.braced || !command.text.starts_with("get_") {
            return Self::Opaque;
        }

        let mut patterns = Vec::new();
        let mut explicit = false;
        for word in args {
            if word.is_expression() {
                return Self::Opaque;
            }
            if !word.braced && word.text.starts_with('-') {
                if VALUED_QUERY_FLAGS.contains(&word.text) {
                    // Objects selected by filter or relation are unknown.
                    return Self::Opaque;
                }
                continue;
            }
            explicit = true;
            patterns.extend(word.text.split_whitespace().map(str::to_string));
        }

        Self::Query {
            command: command.text.to_string(),
            patterns,
            explicit,
        }
    }

    /// Object names or patterns. Empty for opaque expressions.
    pub fn names(&self) -> &[String] {
        match self {
            Self::Query { patterns, .. } => patterns,
            Self::Names(names) => names,
            Self::Opaque => &[],
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.names().first().map(String::as_str)
    }

    /// Returns `true` if the expression names no objects at all.
    ///
    /// A query without pattern words, such as `[get_ports]`, selects every
    /// object and is not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Query {
                patterns, explicit, ..
            } => *explicit && patterns.is_empty(),
            Self::Names(names) => names.is_empty(),
            Self::Opaque => false,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }

    /// Returns `true` for `[get_clocks ...]`.
    pub fn is_clock_query(&self) -> bool {
        matches!(self, Self::Query { command, .. } if command == "get_clocks")
    }

    /// Returns `true` if a name is a bare `*` or `**`.
    pub fn has_bare_wildcard(&self) -> bool {
        self.names()
            .iter()
            .any(|name| name == "*" || name == "**")
    }
}

/// Returns `true` if `name` is a pattern rather than a literal name.
pub fn is_pattern(name: &str) -> bool {
    name.contains(['*', '?'])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Word<'a> {
    text: &'a str,
    braced: bool,
}

impl Word<'_> {
    /// A nested `[...]` expression.
    fn is_expression(&self) -> bool {
        !self.braced && self.text.starts_with('[')
    }
}

/// Split TCL-style words. Braced and quoted words lose their delimiters;
/// bracketed words keep theirs. Nesting is respected.
fn split_words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let bytes = text.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index].is_ascii_whitespace() {
            index += 1;
            continue;
        }

        let start = index;
        match bytes[index] {
            b'{' => {
                let end = matching(bytes, index, b'{', b'}');
                let close = end.min(bytes.len());
                words.push(Word {
                    text: &text[start + 1..close],
                    braced: true,
                });
                index = close + 1;
            }
            b'"' => {
                let close = bytes[start + 1..]
                    .iter()
                    .position(|b| *b == b'"')
                    .map_or(bytes.len(), |offset| start + 1 + offset);
                words.push(Word {
                    text: &text[start + 1..close],
                    braced: true,
                });
                index = close + 1;
            }
            _ => {
                let mut depth = 0usize;
                while index < bytes.len() {
                    match bytes[index] {
                        b'[' => depth += 1,
                        b']' => depth = depth.saturating_sub(1),
                        byte if byte.is_ascii_whitespace() && depth == 0 => break,
                        _ => {}
                    }
                    index += 1;
                }
                words.push(Word {
                    text: &text[start..index],
                    braced: false,
                });
            }
        }
    }

    words
}

/// Index of the delimiter closing the one at `open_index`, or the input
/// length if it is never closed.
fn matching(bytes: &[u8], open_index: usize, open: u8, close: u8) -> usize {
    let mut depth = 0usize;
    for (index, byte) in bytes.iter().enumerate().skip(open_index) {
        if *byte == open {
            depth += 1;
        } else if *byte == close {
            depth -= 1;
            if depth == 0 {
                return index;
            }
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &ObjectList) -> Vec<&str> {
        list.names().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_plain_names() {
        let list = ObjectList::parse("clk_a clk_b");
        assert_eq!(names(&list), ["clk_a", "clk_b"]);
        assert!(!list.is_query());
        assert_eq!(list.first_name(), Some("clk_a"));

        let list = ObjectList::parse("a {b c}");
        assert_eq!(names(&list), ["a", "b", "c"]);

        let list = ObjectList::parse("din[0]");
        assert_eq!(names(&list), ["din[0]"]);
    }

    #[test]
    fn test_query() {
        let list = ObjectList::parse("[get_ports {din[*] clk}]");
        assert_eq!(names(&list), ["din[*]", "clk"]);
        assert!(list.is_query());
        assert!(!list.is_clock_query());

        let list = ObjectList::parse("[get_clocks -quiet clk_a]");
        assert!(list.is_clock_query());
        assert_eq!(names(&list), ["clk_a"]);
    }

    #[test]
    fn test_opaque_expressions() {
        assert_eq!(ObjectList::parse("[all_inputs]"), ObjectList::Opaque);
        assert_eq!(ObjectList::parse("[get_pins -of_objects x]"), ObjectList::Opaque);
        assert_eq!(ObjectList::parse("[get_ports [all_inputs]]"), ObjectList::Opaque);
        assert_eq!(ObjectList::parse("[get_ports a] b"), ObjectList::Opaque);
        assert_eq!(
            ObjectList::parse("[get_ports a] [get_ports b]"),
            ObjectList::Opaque
        );
        assert!(!ObjectList::Opaque.is_empty());
    }

    #[test]
    fn test_empty_lists() {
        assert!(ObjectList::parse("").is_empty());
        assert!(ObjectList::parse("   ").is_empty());
        assert!(ObjectList::parse("[get_ports {}]").is_empty());
        assert!(ObjectList::parse("{}").is_empty());
        assert!(!ObjectList::parse("[get_ports]").is_empty());
        assert!(!ObjectList::parse("[get_ports a]").is_empty());
    }

    #[test]
    fn test_wildcards() {
        assert!(ObjectList::parse("*").has_bare_wildcard());
        assert!(ObjectList::parse("[get_pins **]").has_bare_wildcard());
        assert!(!ObjectList::parse("[get_pins u_*/D]").has_bare_wildcard());
        assert!(is_pattern("u_*/D"));
        assert!(!is_pattern("clk"));
    }

    #[test]
    fn test_unbalanced_words_do_not_panic() {
        assert_eq!(names(&ObjectList::parse("{a b")), ["a", "b"]);
        assert_eq!(names(&ObjectList::parse("\"a b")), ["a", "b"]);
    }
}
