//! Support for Apple `.strings` files: one `"key" = "value";` line per key.
//!
//! Provides parsing, serialization, and conversion to/from [`Catalog`].

use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::{error::Error, traits::Parser, types::Catalog};

/// Represents an Apple `.strings` localization file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Language label; `.strings` files carry none, so this comes from the caller.
    pub language: String,
    /// All key-value pairs, in file order.
    pub pairs: Vec<Pair>,
}

/// A single key-value pair in a `.strings` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" = \"{}\";", escape(&self.key), escape(&self.value))
    }
}

/// Escapes a key or value for a double-quoted `.strings` literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        Ok(Format {
            language: String::new(),
            pairs: Lexer::new(content).pairs()?,
        })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::new();
        for pair in &self.pairs {
            content.push_str(&pair.to_string());
            content.push('\n');
        }
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// BOM-aware reading: UTF-16 `.strings` files are decoded to UTF-8.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(&path)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded)?;

        Self::from_str(&decoded).map_err(|e| e.in_file(&path))
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        Catalog::from_entries(
            value.language,
            value.pairs.into_iter().map(|pair| (pair.key, pair.value)),
        )
    }
}

impl From<Catalog> for Format {
    fn from(value: Catalog) -> Self {
        let (language, entries) = value.into_parts();
        Format {
            language,
            pairs: entries
                .into_iter()
                .map(|(key, value)| Pair { key, value })
                .collect(),
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn pairs(mut self) -> Result<Vec<Pair>, Error> {
        let mut pairs = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.chars.peek().is_none() {
                return Ok(pairs);
            }
            let key = self.token()?;
            self.expect('=')?;
            let value = self.token()?;
            self.expect(';')?;
            pairs.push(Pair { key, value });
        }
    }

    /// Skips whitespace and both comment styles.
    fn skip_trivia(&mut self) -> Result<(), Error> {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c != '/' {
                return Ok(());
            }
            let start = self.line;
            self.bump();
            match self.bump() {
                Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('*') => {
                    let mut prev = '\0';
                    loop {
                        match self.bump() {
                            Some('/') if prev == '*' => break,
                            Some(c) => prev = c,
                            None => {
                                return Err(Error::parse_at_line(start, "unterminated comment"));
                            }
                        }
                    }
                }
                _ => return Err(Error::parse_at_line(start, "unexpected '/'")),
            }
        }
        Ok(())
    }

    fn expect(&mut self, wanted: char) -> Result<(), Error> {
        self.skip_trivia()?;
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(Error::parse_at_line(
                self.line,
                format!("expected '{}', found '{}'", wanted, c),
            )),
            None => Err(Error::parse_at_line(
                self.line,
                format!("expected '{}', found end of file", wanted),
            )),
        }
    }

    /// A quoted literal or a bare identifier.
    fn token(&mut self) -> Result<String, Error> {
        self.skip_trivia()?;
        match self.chars.peek() {
            Some('"') => self.quoted(),
            Some(&c) if is_bare(c) => {
                let mut out = String::new();
                while let Some(&c) = self.chars.peek() {
                    if !is_bare(c) {
                        break;
                    }
                    out.push(c);
                    self.bump();
                }
                Ok(out)
            }
            Some(&c) => Err(Error::parse_at_line(
                self.line,
                format!("expected a quoted string, found '{}'", c),
            )),
            None => Err(Error::parse_at_line(
                self.line,
                "expected a quoted string, found end of file",
            )),
        }
    }

    fn quoted(&mut self) -> Result<String, Error> {
        let start = self.line;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\'') => out.push('\''),
                    Some('\\') => out.push('\\'),
                    Some('U') | Some('u') => out.push(self.unicode_escape(start)?),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                Some(c) => out.push(c),
                None => break,
            }
        }
        Err(Error::parse_at_line(start, "unterminated quoted string"))
    }

    fn unicode_escape(&mut self, start: usize) -> Result<char, Error> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(Error::parse_at_line(start, "invalid \\U escape")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::parse_at_line(start, format!("invalid \\U{} escape", hex)))
    }
}

fn is_bare(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '$' | ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    #[test]
    fn test_parse_basic_strings_with_comments() {
        let content = r#"
        /* Greeting for the user */
        "hello" = "Hello, world!";
        // Farewell
        "bye" = "Goodbye!";
        "#;
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 2);
        assert_eq!(parsed.pairs[0].key, "hello");
        assert_eq!(parsed.pairs[0].value, "Hello, world!");
        assert_eq!(parsed.pairs[1].key, "bye");
    }

    #[test]
    fn test_serialize_single_pair() {
        let format = Format {
            language: "English".to_string(),
            pairs: vec![Pair {
                key: "greeting".to_string(),
                value: "Hello".to_string(),
            }],
        };
        assert_eq!(format.to_string_content().unwrap(), "\"greeting\" = \"Hello\";\n");
    }

    #[test]
    fn test_escaping_round_trip() {
        let value = "Say \"hi\"\\now\nnext\tline\r end – ünïcödé 👋";
        let format = Format {
            language: String::new(),
            pairs: vec![Pair {
                key: "tricky \"key\"".to_string(),
                value: value.to_string(),
            }],
        };
        let out = format.to_string_content().unwrap();
        assert!(out.contains(r#"\"hi\"\\now\nnext\tline\r end"#));
        assert_eq!(out.lines().count(), 1);
        let reparsed = Format::from_str(&out).unwrap();
        assert_eq!(reparsed.pairs, format.pairs);
    }

    #[test]
    fn test_multiline_value() {
        let content = "\"multi\" = \"line 1\nline 2\";";
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs[0].value, "line 1\nline 2");
    }

    #[test]
    fn test_unquoted_key_and_unicode_escape() {
        let parsed = Format::from_str("title = \"caf\\U00e9\";").unwrap();
        assert_eq!(parsed.pairs[0].key, "title");
        assert_eq!(parsed.pairs[0].value, "café");
    }

    #[test]
    fn test_empty_value() {
        let parsed = Format::from_str(r#""empty" = "";"#).unwrap();
        assert_eq!(parsed.pairs[0].value, "");
    }

    #[test]
    fn test_unterminated_string_reports_line() {
        let content = "\"ok\" = \"fine\";\n\"broken\" = \"never closed;\n";
        let err = Format::from_str(content).unwrap_err();
        match err {
            Error::FormatParse { position, message, .. } => {
                assert_eq!(position.as_deref(), Some("line 2"));
                assert!(message.contains("unterminated"));
            }
            other => panic!("expected FormatParse, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = Format::from_str("\"a\" = \"b\"\n\"c\" = \"d\";").unwrap_err();
        assert!(err.to_string().contains("expected ';'"));
    }

    #[test]
    fn test_garbage_line_is_an_error() {
        let err = Format::from_str("\"a\" = \"b\";\n= nonsense\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Format::from_str("/* open\n\"a\" = \"b\";").unwrap_err();
        assert!(err.to_string().contains("unterminated comment"));
    }

    #[test]
    fn test_read_from_utf16_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fr.strings");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "\"k\" = \"é\";".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();
        let parsed = Format::read_from(&path).unwrap();
        assert_eq!(parsed.pairs[0].value, "é");
    }

    #[test]
    fn test_read_from_tags_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.strings");
        std::fs::write(&path, "\"k\" = \"oops").unwrap();
        let err = Format::read_from(&path).unwrap_err();
        assert!(err.to_string().contains("de.strings"));
    }

    #[test]
    fn test_catalog_conversion_keeps_last_duplicate() {
        let parsed = Format::from_str("\"a\" = \"1\";\n\"a\" = \"2\";").unwrap();
        let catalog = Catalog::from(parsed);
        assert_eq!(catalog.entries(), [("a".to_string(), "2".to_string())]);
    }
}
