use std::fmt;

/// A mime type pattern in which each `*` stands for one or more characters,
/// for example `application/vnd.*+json`. Patterns match whole mime types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePattern {
    source: String,
    literals: Vec<String>,
}

impl MimePattern {
    /// Compiles `pattern`. Matching is ASCII case-insensitive.
    pub fn new(pattern: &str) -> MimePattern {
        let source = pattern.trim().to_ascii_lowercase();
        let literals = source.split('*').map(String::from).collect();
        MimePattern { source, literals }
    }

    /// Returns whether `mime` matches the whole pattern. `mime` is expected
    /// in lower case.
    pub fn matches(&self, mime: &str) -> bool {
        match self.literals.split_first() {
            Some((head, tail)) => match mime.strip_prefix(head.as_str()) {
                Some(rest) => matches_tail(rest, tail),
                None => false,
            },
            None => mime.is_empty(),
        }
    }
}

/// Matches `input` against `*literal*literal...`, where every wildcard
/// consumes at least one character.
fn matches_tail(input: &str, literals: &[String]) -> bool {
    let (literal, rest) = match literals.split_first() {
        Some(split) => split,
        None => return input.is_empty(),
    };

    // The wildcard before `literal` takes 1..n characters.
    input.char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(input.len()))
        .filter(|&i| i > 0)
        .any(|i| match input[i..].strip_prefix(literal.as_str()) {
            Some(after) => matches_tail(after, rest),
            None => false,
        })
}

impl fmt::Display for MimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::MimePattern;

    #[test]
    fn vendor_types() {
        let pattern = MimePattern::new("application/vnd.*+xml");
        assert!(pattern.matches("application/vnd.com.example.customer+xml"));
        assert!(pattern.matches("application/vnd.com.example.customer-v2+xml"));
        assert!(pattern.matches("application/vnd.a+xml"));
        assert!(!pattern.matches("application/vnd.+xml"));
        assert!(!pattern.matches("application/vnd.customer+json"));
        assert!(!pattern.matches("application/vnd.customer+xml; charset=utf-8"));
        assert!(!pattern.matches("text/application/vnd.customer+xml"));
    }

    #[test]
    fn wildcard_is_greedy_enough() {
        let pattern = MimePattern::new("application/vnd.*+json");
        assert!(pattern.matches("application/vnd.github.v3+json"));
        assert!(pattern.matches("application/vnd.a+json+json"));
        assert!(!pattern.matches("application/vnd.a+jsonx"));
    }

    #[test]
    fn multiple_and_trailing_wildcards() {
        let pattern = MimePattern::new("*/*+json");
        assert!(pattern.matches("application/problem+json"));
        assert!(!pattern.matches("/problem+json"));

        let pattern = MimePattern::new("text/*");
        assert!(pattern.matches("text/plain"));
        assert!(!pattern.matches("text/"));
    }

    #[test]
    fn literal_pattern() {
        let pattern = MimePattern::new("Application/JSON");
        assert!(pattern.matches("application/json"));
        assert!(!pattern.matches("application/jsonx"));
        assert_eq!(pattern.to_string(), "application/json");
    }
}
