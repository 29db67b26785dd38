//! Host matching
// (c) 2024 Ross Younger

use std::fmt::Display;

use regex::Regex;

use crate::{Error, Result};

/// Converts a shell-style wildcard into an anchored regular expression.
///
/// `*` matches any sequence, `?` any single character, and `[...]` is passed
/// through as a character class (`[!...]` negates). Every other character is
/// literal, so `.` only matches a dot.
pub(crate) fn wildcard_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^(?:");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                // The class runs to the next `]`; one immediately after the
                // opening bracket (or after a negating `!`) is a member.
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                match chars[j.min(chars.len())..].iter().position(|&c| c == ']') {
                    Some(offset) => {
                        let end = j + offset;
                        out.push('[');
                        let mut body = &chars[i + 1..end];
                        if body.first() == Some(&'!') {
                            out.push('^');
                            body = &body[1..];
                        }
                        out.extend(body);
                        out.push(']');
                        i = end;
                    }
                    None => out.push_str(r"\["),
                }
            }
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }
    out.push_str(")$");
    out
}

#[derive(Debug, Clone)]
struct Rule {
    negated: bool,
    regex: Regex,
}

/// The compiled form of a `Host` line's value.
///
/// A value may hold several whitespace-separated wildcards, any of which may be
/// negated with a leading `!`. As in `ssh_config(5)`, a candidate matches when at
/// least one plain wildcard matches and no negated wildcard does.
#[derive(Debug, Clone)]
pub(crate) struct HostPattern {
    raw: String,
    /// `None` for a literal name, which only matches itself
    rules: Option<Vec<Rule>>,
}

impl HostPattern {
    pub(crate) fn new(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let rules = raw
            .split_whitespace()
            .map(|word| -> Result<Rule> {
                let (negated, wildcard) = match word.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, word),
                };
                let regex = Regex::new(&wildcard_to_regex(wildcard)).map_err(|e| Error::Pattern {
                    pattern: raw.to_owned(),
                    source: Box::new(e),
                })?;
                Ok(Rule { negated, regex })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            raw: raw.to_owned(),
            rules: Some(rules),
        })
    }

    pub(crate) fn literal(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
            rules: None,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.raw
    }

    pub(crate) fn matches(&self, candidate: &str) -> bool {
        let Some(rules) = &self.rules else {
            return candidate == self.raw;
        };
        let mut matched = false;
        for rule in rules {
            if rule.regex.is_match(candidate) {
                if rule.negated {
                    return false;
                }
                matched = true;
            }
        }
        matched
    }
}

impl PartialEq for HostPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for HostPattern {}

impl Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::{wildcard_to_regex, HostPattern};
    use anyhow::{anyhow, Context, Result};
    use assertables::assert_eq_as_result;

    fn matches(pattern: &str, candidate: &str) -> bool {
        HostPattern::new(pattern).unwrap().matches(candidate)
    }

    #[test]
    fn regex_conversion() {
        for (input, expected) in [
            ("file*.txt", r"^(?:file.*\.txt)$"),
            ("myfile?.log", r"^(?:myfile.\.log)$"),
            ("file[123].txt", r"^(?:file[123]\.txt)$"),
            ("host[!0-4]", r"^(?:host[^0-4])$"),
            ("a+b(c)", r"^(?:a\+b\(c\))$"),
            ("open[bracket", r"^(?:open\[bracket)$"),
        ] {
            assert_eq!(wildcard_to_regex(input), expected, "input {input}");
        }
    }

    #[test]
    fn host_matching() -> Result<()> {
        for (pattern, candidate, result) in [
            ("file*.txt", "file123.txt", true),
            ("file*.txt", "file.txt", true),
            ("file*.txt", "file123.tx", false),
            ("myfile?.log", "myfileA.log", true),
            ("myfile?.log", "myfile.log", false),
            ("myfile?.log", "myfileAB.log", false),
            ("a.b", "a.b", true),
            ("a.b", "axb", false),
            ("a+", "aa", false),
            ("a+", "a+", true),
            ("file[123].txt", "file2.txt", true),
            ("file[123].txt", "file4.txt", false),
            ("host[!0-4]", "host7", true),
            ("host[!0-4]", "host3", false),
            ("*", "anything.at.all", true),
            ("*", "", true),
            ("*.example.com", "www.example.com", true),
            ("*.example.com", "example.com", false),
            ("foo", "foo", true),
            ("foo", "foobar", false),
            ("foo", "xfoo", false),
            ("192.168.?.42", "192.168.1.42", true),
            ("192.168.?.42", "192.168.10.42", false),
        ] {
            assert_eq_as_result!(matches(pattern, candidate), result)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("pattern {pattern}, candidate {candidate}"))?;
        }
        Ok(())
    }

    #[test]
    fn multiple_and_negated() -> Result<()> {
        for (pattern, candidate, result) in [
            ("bar foo", "foo", true),
            ("bar foo", "baz", false),
            ("*.corp !secret.corp", "web.corp", true),
            ("*.corp !secret.corp", "secret.corp", false),
            ("!secret.corp", "web.corp", false),
        ] {
            assert_eq_as_result!(matches(pattern, candidate), result)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("pattern {pattern}, candidate {candidate}"))?;
        }
        Ok(())
    }

    #[test]
    fn bad_class_is_an_error() {
        let _ = HostPattern::new("host[z-a]").unwrap_err();
    }

    /// Straightforward recursive wildcard matcher to check the regex translation against
    fn reference_match(text: &[char], pattern: &[char]) -> bool {
        match pattern.split_first() {
            None => text.is_empty(),
            Some(('*', rest)) => {
                reference_match(text, rest) || (!text.is_empty() && reference_match(&text[1..], pattern))
            }
            Some(('?', rest)) => !text.is_empty() && reference_match(&text[1..], rest),
            Some((c, rest)) => text.first() == Some(c) && reference_match(&text[1..], rest),
        }
    }

    #[test]
    fn agrees_with_reference_matcher() {
        const ALPHABET: &[char] = &['a', 'b', '.', '-'];
        const WILD: &[char] = &['a', 'b', '.', '-', '*', '?'];
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..2000 {
            let pattern: String = (0..rng.usize(1..7))
                .map(|_| WILD[rng.usize(..WILD.len())])
                .collect();
            let text: String = (0..rng.usize(0..8))
                .map(|_| ALPHABET[rng.usize(..ALPHABET.len())])
                .collect();
            let expected = reference_match(
                &text.chars().collect::<Vec<_>>(),
                &pattern.chars().collect::<Vec<_>>(),
            );
            assert_eq!(
                matches(&pattern, &text),
                expected,
                "pattern {pattern:?}, text {text:?}"
            );
        }
    }
}
