//! Line parsing internals
// (c) 2024 Ross Younger

use std::borrow::Cow;

#[derive(Debug, PartialEq)]
/// A parsed line we read from an ssh config file
pub(super) enum Line {
    Empty,
    Host {
        args: Vec<String>,
    },
    /// `Match` or `Include`, which we refuse to guess at
    Unsupported {
        keyword: String,
    },
    Generic {
        keyword: String, /* as written */
        args: Vec<String>,
    },
}

/// Splits off a line's keyword, which may be delimited by whitespace (Key Value) OR equals (Key=Value).
///
/// Blank lines and comments have no keyword.
pub(super) fn split_keyword(line: &str) -> Option<(&str, &str)> {
    let mut splitter = line.trim().splitn(2, &[' ', '\t', '=']);
    match splitter.next() {
        None | Some("") => None,
        Some(kw) if kw.starts_with('#') => None,
        Some(kw) => Some((kw, splitter.next().unwrap_or_default())),
    }
}

/// Does this line open a block?
pub(super) fn is_host_line(line: &str) -> bool {
    split_keyword(line).is_some_and(|(kw, _)| kw.eq_ignore_ascii_case("host"))
}

/// Classifies one line of input. Errors are returned as bare messages;
/// the caller knows where the line came from.
pub(super) fn parse_line(line: &str) -> Result<Line, String> {
    let Some((keyword, rest)) = split_keyword(line) else {
        return Ok(Line::Empty);
    };
    // `Key = Value` is also permitted
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest);

    let args = split_args(rest)?;
    if args.is_empty() {
        return Err(format!("missing argument to {keyword}"));
    }

    Ok(match keyword.to_ascii_lowercase().as_str() {
        "host" => Line::Host { args },
        "match" | "include" => Line::Unsupported {
            keyword: keyword.to_owned(),
        },
        _ => Line::Generic {
            keyword: keyword.to_owned(),
            args,
        },
    })
}

///////////////////////////////////////////////////////////////////////////////////////

/// Splits a string into a list of arguments.
/// Arguments are delimited by whitespace, subject to quoting (single or double quotes), and simple escapes (\\, \", \').
/// An unquoted `#` at the start of an argument begins a comment.
pub(super) fn split_args(input: &str) -> Result<Vec<String>, String> {
    let mut chars = input.chars().peekable();
    let mut output = Vec::<String>::new();
    loop {
        // Strip any leading whitespace
        while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}
        match chars.peek() {
            None | Some('#') => break,
            Some(_) => (),
        }

        // We're at the start of a real token
        let mut current_arg = String::new();
        let mut quote_state: Option<char> = None;

        while let Some(ch) = chars.next() {
            match (ch, quote_state) {
                ('\\', _) => match chars.next_if(|nn| matches!(nn, '\'' | '"' | '\\')) {
                    Some(escaped) => current_arg.push(escaped),
                    None => current_arg.push(ch), // Unrecognised escapes are literal
                },
                (' ' | '\t', None) => break, // end of token
                (q @ ('\'' | '"'), None) => quote_state = Some(q),
                (q, Some(open)) if q == open => quote_state = None,
                (c, _) => current_arg.push(c),
            }
        }

        if quote_state.is_some() {
            return Err("unterminated quote".into());
        }
        output.push(current_arg);
    }
    Ok(output)
}

/// The inverse of [`split_args`] for a single argument: quotes it if it would not otherwise read back intact.
pub(super) fn quote_arg(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty()
        || arg.starts_with('#')
        || arg.starts_with('=')
        || arg
            .chars()
            .any(|c| matches!(c, ' ' | '\t' | '"' | '\'' | '\\'));
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::{assert_contains_as_result, assert_eq_as_result};

    use super::{is_host_line, parse_line, quote_arg, split_args, Line};

    macro_rules! make_vec {
        ($v:expr) => {
            $v.into_iter().map(|s| s.into()).collect()
        };
    }

    fn host_(args: Vec<&str>) -> Line {
        Line::Host {
            args: make_vec!(args),
        }
    }
    fn generic_(kw: &str, args: Vec<&str>) -> Line {
        Line::Generic {
            keyword: kw.into(),
            args: make_vec!(args),
        }
    }

    #[test]
    fn arg_splitting() -> Result<()> {
        for (input, expected) in [
            ("", vec![]),
            ("a", vec!["a"]),
            ("   a    b   ", vec!["a", "b"]),
            (" a b # c d", vec!["a", "b"]),
            (r#"a\ \' \"b"#, vec!["a\\", "'", "\"b"]),
            (r#""a b" 'c d'"#, vec!["a b", "c d"]),
            (r#""a \"b" '\'c d'"#, vec!["a \"b", "'c d"]),
            (r#""""#, vec![""]),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(split_args(input).map_err(|e| anyhow!(e)).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        for (input, expected_msg) in [
            ("aaa\"bbb", "unterminated quote"),
            ("'", "unterminated quote"),
        ] {
            let err = split_args(input).unwrap_err();
            assert_contains_as_result!(err, expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn line_parsing() -> Result<()> {
        for (input, expected) in [
            ("", Line::Empty),
            ("   \t ", Line::Empty),
            (" # foo bar baz", Line::Empty),
            ("HostName example.com", generic_("HostName", vec!["example.com"])),
            ("\tUser alice # trailing", generic_("User", vec!["alice"])),
            ("Foo Bar baz", generic_("Foo", vec!["Bar", "baz"])),
            ("Foo \"Bar baz\"", generic_("Foo", vec!["Bar baz"])),
            ("Foo=bar", generic_("Foo", vec!["bar"])),
            ("Foo = bar", generic_("Foo", vec!["bar"])),
            ("Host a b", host_(vec!["a", "b"])),
            ("host *.example.com", host_(vec!["*.example.com"])),
            (
                "Match all",
                Line::Unsupported {
                    keyword: "Match".into(),
                },
            ),
            (
                "iNcluDe c d",
                Line::Unsupported {
                    keyword: "iNcluDe".into(),
                },
            ),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(parse_line(input).map_err(|e| anyhow!(e)).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        for (input, expected_msg) in [
            ("aaa bbb \" ccc", "unterminated quote"),
            ("aaa", "missing argument"),
            ("Host", "missing argument"),
        ] {
            let err = parse_line(input).unwrap_err();
            assert_contains_as_result!(err, expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn host_line_detection() {
        for (input, expected) in [
            ("Host a", true),
            ("  hOsT=a b", true),
            ("Host", true),
            ("HostName a", false),
            ("# Host a", false),
            ("", false),
            ("Include \"unterminated", false),
        ] {
            assert_eq!(is_host_line(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn quoting_reads_back() -> Result<()> {
        for input in [
            "plain",
            "with space",
            "",
            "#hash",
            "=eq",
            r#"say "hi""#,
            r"C:\keys\id",
            "it's",
            "tab\there",
        ] {
            let quoted = quote_arg(input);
            let back = split_args(&quoted).map_err(|e| anyhow!(e))?;
            assert_eq!(back, vec![input.to_string()], "input {input:?} quoted as {quoted}");
        }
        assert_eq!(quote_arg("plain"), "plain");
        Ok(())
    }
}
