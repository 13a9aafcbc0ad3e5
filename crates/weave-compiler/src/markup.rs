//! Tokenizer for component tags embedded in document bodies.
//!
//! Raw HTML chunks reported by the Markdown parser are split into opening
//! tags, closing tags and text. Anything starting with `<` that does not form
//! a complete tag is kept as text; comments are dropped.

/// Attribute value as written in the source.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AttrValue {
    /// Quoted or bare string.
    Literal(String),
    /// Contents of a `{...}` expression.
    Expression(String),
    /// Attribute written without a value.
    Flag,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Open {
        name: String,
        attrs: Vec<(String, AttrValue)>,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    Text(String),
}

/// Split `html` into tokens paired with their byte offset in `html`.
pub(crate) fn tokenize(html: &str) -> Vec<(usize, Token)> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while let Some(rel) = html[pos..].find('<') {
        let at = pos + rel;
        let rest = &html[at..];

        let scanned = if rest.starts_with("<!--") {
            let len = rest.find("-->").map_or(rest.len(), |end| end + 3);
            Some((len, None))
        } else {
            scan_tag(rest).map(|(len, token)| (len, Some(token)))
        };

        match scanned {
            Some((len, token)) => {
                push_text(&mut tokens, text_start, &html[text_start..at]);
                if let Some(token) = token {
                    tokens.push((at, token));
                }
                pos = at + len;
                text_start = pos;
            }
            None => pos = at + 1,
        }
    }
    push_text(&mut tokens, text_start, &html[text_start..]);
    tokens
}

/// Text spanning several lines is trimmed line by line and joined with
/// spaces; whitespace-only text is dropped.
fn push_text(tokens: &mut Vec<(usize, Token)>, offset: usize, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let text = if text.contains('\n') {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_owned()
    };
    tokens.push((offset, Token::Text(decode_entities(&text))));
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn take_name(s: &str) -> (&str, &str) {
    let end = s.find(|c| !is_name_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

/// Scan one tag at the start of `s`. Returns its byte length and token.
fn scan_tag(s: &str) -> Option<(usize, Token)> {
    if let Some(after) = s.strip_prefix("</") {
        let (name, rest) = take_name(after);
        if !name.starts_with(is_name_start) {
            return None;
        }
        let trimmed = rest.trim_start();
        if !trimmed.starts_with('>') {
            return None;
        }
        let len = s.len() - trimmed.len() + 1;
        return Some((
            len,
            Token::Close {
                name: name.to_owned(),
            },
        ));
    }

    let after = s.strip_prefix('<')?;
    if !after.starts_with(is_name_start) {
        return None;
    }
    let end = find_tag_end(after)?;
    let inner = &after[..end];
    let (name, rest) = take_name(inner);

    let rest = rest.trim_end();
    let (rest, self_closing) = match rest.strip_suffix('/') {
        Some(r) => (r, true),
        None => (rest, false),
    };
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let attrs = parse_attrs(rest)?;

    Some((
        end + 2,
        Token::Open {
            name: name.to_owned(),
            attrs,
            self_closing,
        },
    ))
}

/// Byte index of the `>` closing the tag, ignoring `>` inside quotes or braces.
pub(crate) fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && depth > 0 {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_attrs(mut s: &str) -> Option<Vec<(String, AttrValue)>> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return Some(attrs);
        }
        let (name, rest) = take_name(s);
        if !name.starts_with(is_name_start) {
            return None;
        }
        let after_name = rest.trim_start();
        let Some(value_src) = after_name.strip_prefix('=') else {
            attrs.push((name.to_owned(), AttrValue::Flag));
            s = rest;
            continue;
        };
        let value_src = value_src.trim_start();
        let (value, remaining) = parse_value(value_src)?;
        attrs.push((name.to_owned(), value));
        s = remaining;
    }
}

fn parse_value(s: &str) -> Option<(AttrValue, &str)> {
    let first = s.chars().next()?;
    match first {
        '"' | '\'' => {
            let body = &s[1..];
            let end = body.find(first)?;
            Some((
                AttrValue::Literal(decode_entities(&body[..end])),
                &body[end + 1..],
            ))
        }
        '{' => {
            let end = find_closing_brace(s)?;
            Some((AttrValue::Expression(s[1..end].trim().to_owned()), &s[end + 1..]))
        }
        _ => {
            let end = s.find(char::is_whitespace).unwrap_or(s.len());
            Some((AttrValue::Literal(s[..end].to_owned()), &s[end..]))
        }
    }
}

/// Index of the `}` matching the `{` at the start of `s`.
fn find_closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
