//! Support for PHP language files: an associative array assigned to `$LANG`.
//!
//! Written as
//!
//! ```php
//! <?php
//! $LANG = array(
//!     'greeting' => 'Hello',
//! );
//! ```
//!
//! Reading also accepts short `[...]` arrays, `return array(...)` files and
//! one-assignment-per-line files (`$LANG['greeting'] = "Hello";`).

use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser, types::Catalog};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub language: String,
    pub entries: Vec<(String, String)>,
}

/// Escapes a string for a single-quoted PHP literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
    out
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let tokens = tokenize(&content)?;
        Ok(Format {
            language: String::new(),
            entries: pairs(&tokens)?,
        })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from("<?php\n$LANG = array(\n");
        for (key, value) in &self.entries {
            content.push_str(&format!("    '{}' => '{}',\n", escape(key), escape(value)));
        }
        content.push_str(");\n");
        writer.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl From<Catalog> for Format {
    fn from(value: Catalog) -> Self {
        let (language, entries) = value.into_parts();
        Format { language, entries }
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        Catalog::from_entries(value.language, value.entries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Str(String),
    Var(String),
    Word(String),
    Arrow,
    Assign,
    Open(char),
    Close(char),
    Punct(char),
}

fn tokenize(content: &str) -> Result<Vec<(Token, usize)>, Error> {
    let chars: Vec<char> = content.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '<' if content_at(&chars, i, "<?php") => i += 5,
            '?' if next == Some('>') => i += 2,
            '#' => i = skip_line(&chars, i),
            '/' if next == Some('/') => i = skip_line(&chars, i),
            '/' if next == Some('*') => {
                let start = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 2;
                            break;
                        }
                        Some('\n') => line += 1,
                        Some(_) => {}
                        None => return Err(Error::parse_at_line(start, "unterminated comment")),
                    }
                    i += 1;
                }
            }
            '\'' | '"' => {
                let start = line;
                let (value, consumed, newlines) = read_literal(&chars[i..], c)
                    .ok_or_else(|| Error::parse_at_line(start, "unterminated string literal"))?;
                tokens.push((Token::Str(value), start));
                line += newlines;
                i += consumed;
            }
            '=' if next == Some('>') => {
                tokens.push((Token::Arrow, line));
                i += 2;
            }
            '=' => {
                tokens.push((Token::Assign, line));
                i += 1;
            }
            '(' | '[' => {
                tokens.push((Token::Open(c), line));
                i += 1;
            }
            ')' | ']' => {
                tokens.push((Token::Close(c), line));
                i += 1;
            }
            '$' => {
                let end = word_end(&chars, i + 1);
                tokens.push((Token::Var(chars[i + 1..end].iter().collect()), line));
                i = end.max(i + 1);
            }
            c if c.is_alphanumeric() || c == '_' => {
                let end = word_end(&chars, i);
                tokens.push((Token::Word(chars[i..end].iter().collect()), line));
                i = end;
            }
            c => {
                tokens.push((Token::Punct(c), line));
                i += 1;
            }
        }
    }
    Ok(tokens)
}

fn content_at(chars: &[char], i: usize, s: &str) -> bool {
    s.chars().enumerate().all(|(n, c)| chars.get(i + n) == Some(&c))
}

fn skip_line(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

fn word_end(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    i
}

/// Reads a quoted literal starting at `chars[0]`. Returns the decoded value,
/// the number of chars consumed and the number of newlines crossed.
fn read_literal(chars: &[char], quote: char) -> Option<(String, usize, usize)> {
    let mut out = String::new();
    let mut newlines = 0;
    let mut i = 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            newlines += 1;
        }
        if c == quote {
            return Some((out, i + 1, newlines));
        }
        if c == '\\' && i + 1 < chars.len() {
            let escaped = chars[i + 1];
            let decoded = if quote == '\'' {
                match escaped {
                    '\'' | '\\' => Some(escaped),
                    _ => None,
                }
            } else {
                match escaped {
                    'n' => Some('\n'),
                    't' => Some('\t'),
                    'r' => Some('\r'),
                    'v' => Some('\u{000B}'),
                    'f' => Some('\u{000C}'),
                    'e' => Some('\u{001B}'),
                    '0' => Some('\0'),
                    '\\' | '"' | '$' => Some(escaped),
                    _ => None,
                }
            };
            match decoded {
                Some(d) => {
                    out.push(d);
                    i += 2;
                }
                None => {
                    out.push('\\');
                    i += 1;
                }
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    None
}

/// Extracts `'key' => 'value'` and `$VAR['key'] = 'value'` pairs and checks
/// bracket balance.
fn pairs(tokens: &[(Token, usize)]) -> Result<Vec<(String, String)>, Error> {
    let mut out = Vec::new();
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (i, (token, line)) in tokens.iter().enumerate() {
        match token {
            Token::Open(c) => stack.push((*c, *line)),
            Token::Close(c) => {
                let expected = if *c == ')' { '(' } else { '[' };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Err(Error::parse_at_line(
                            *line,
                            format!("'{}' closes '{}' opened on line {}", c, open, open_line),
                        ));
                    }
                    None => {
                        return Err(Error::parse_at_line(*line, format!("unbalanced '{}'", c)));
                    }
                }
            }
            Token::Arrow => {
                let key = match i.checked_sub(1).map(|p| &tokens[p].0) {
                    Some(Token::Str(key)) => key,
                    _ => continue,
                };
                match tokens.get(i + 1) {
                    Some((Token::Str(value), _)) => out.push((key.clone(), value.clone())),
                    _ => {
                        return Err(Error::parse(
                            Some(format!("line {}, key {}", line, key)),
                            "value must be a string literal",
                        ));
                    }
                }
            }
            Token::Assign => {
                // $VAR [ 'key' ] = 'value'
                let key = match i.checked_sub(4).map(|p| &tokens[p..i]) {
                    Some(
                        [
                            (Token::Var(_), _),
                            (Token::Open('['), _),
                            (Token::Str(key), _),
                            (Token::Close(']'), _),
                        ],
                    ) => key,
                    _ => continue,
                };
                match tokens.get(i + 1) {
                    Some((Token::Str(value), _)) => out.push((key.clone(), value.clone())),
                    _ => {
                        return Err(Error::parse(
                            Some(format!("line {}, key {}", line, key)),
                            "value must be a string literal",
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some((open, line)) = stack.pop() {
        return Err(Error::parse_at_line(line, format!("unclosed '{}'", open)));
    }
    Ok(out)
}
