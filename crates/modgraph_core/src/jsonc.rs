//! Reduces tsconfig-flavoured JSON (comments, trailing commas) to plain JSON.
//!
//! Removed text is replaced with spaces and newlines are kept, so line numbers
//! reported by `serde_json` still point into the original file.

pub(crate) fn to_plain_json(text: &str) -> String {
    strip_trailing_commas(&strip_comments(text))
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                chars.next();
                out.push_str("  ");
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    out.push(' ');
                }
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for next in chars.by_ref() {
                    out.push(if next == '\n' { '\n' } else { ' ' });
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 1;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            out.push(if matches!(next, Some('}') | Some(']')) { ' ' } else { ',' });
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(text: &str) -> Value {
        serde_json::from_str(&to_plain_json(text)).unwrap()
    }

    #[test]
    fn test_line_comments_removed() {
        let v = parse("{\n  // comment\n  \"a\": 1 // trailing\n}");
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_block_comments_removed() {
        let v = parse("{ /* one\n two */ \"a\": [1, /* inline */ 2] }");
        assert_eq!(v["a"][1], 2);
    }

    #[test]
    fn test_comment_markers_inside_strings_kept() {
        let v = parse(r#"{ "include": ["src/**/*", "http://x//y"], "q": "a\"//b" }"#);
        assert_eq!(v["include"][0], "src/**/*");
        assert_eq!(v["include"][1], "http://x//y");
        assert_eq!(v["q"], "a\"//b");
    }

    #[test]
    fn test_trailing_commas_removed() {
        let v = parse("{ \"a\": [1, 2,], \"b\": { \"c\": true, }, }");
        assert_eq!(v["a"].as_array().unwrap().len(), 2);
        assert_eq!(v["b"]["c"], true);
    }

    #[test]
    fn test_trailing_comma_before_comment() {
        let v = parse("{ \"a\": 1, // last\n}");
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_line_numbers_preserved() {
        let text = "{\n/* a\nb */\n\"a\": }";
        let err = serde_json::from_str::<Value>(&to_plain_json(text)).unwrap_err();
        assert_eq!(err.line(), 4);
    }
}
