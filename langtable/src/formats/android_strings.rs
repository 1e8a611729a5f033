//! Support for Android `strings.xml` localization format.
//!
//! Only singular `<string>` elements are read; `<plurals>` and
//! `<string-array>` are skipped. Provides parsing, serialization, and
//! conversion to/from [`Catalog`].

use quick_xml::{
    Reader, Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser, types::Catalog};

#[derive(Debug, Default, Serialize)]
pub struct Format {
    pub language: String,
    pub strings: Vec<StringResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringResource {
    pub name: String,
    pub value: String,
    pub translatable: Option<bool>,
}

fn xml_error<R>(reader: &Reader<R>, err: impl std::fmt::Display) -> Error {
    Error::parse(
        Some(format!("byte {}", reader.error_position())),
        err.to_string(),
    )
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut resources = Vec::new();
        let mut depth = 0usize;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let sr = parse_string_resource(e, &mut xml_reader)?;
                    resources.push(sr);
                }
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        Error::parse(
                            Some(format!("byte {}", xml_reader.buffer_position())),
                            "unexpected closing tag",
                        )
                    })?;
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = name_attribute(e)?;
                    resources.push(StringResource {
                        name,
                        value: String::new(),
                        translatable,
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(xml_error(&xml_reader, e)),
            }
            buf.clear();
        }
        if depth != 0 {
            return Err(Error::parse(None, "unexpected end of document: unclosed element"));
        }
        Ok(Format {
            language: String::new(), // strings.xml does not contain language metadata
            strings: resources,
        })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);
        write_document(&mut xml_writer, &self.strings).map_err(std::io::Error::other)?;
        Ok(())
    }
}

fn write_document<W: Write>(
    xml_writer: &mut Writer<W>,
    strings: &[StringResource],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;

    for sr in strings {
        let mut elem = BytesStart::new("string");
        elem.push_attribute(("name", sr.name.as_str()));
        if let Some(trans) = sr.translatable {
            elem.push_attribute(("translatable", if trans { "true" } else { "false" }));
        }

        xml_writer.write_event(Event::Text(BytesText::from_escaped("    ")))?;
        xml_writer.write_event(Event::Start(elem))?;
        xml_writer.write_event(Event::Text(BytesText::from_escaped(escape(&sr.value))))?;
        xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
        xml_writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    Ok(())
}

impl From<Catalog> for Format {
    fn from(value: Catalog) -> Self {
        let (language, entries) = value.into_parts();
        Self {
            language,
            strings: entries
                .into_iter()
                .map(|(name, value)| StringResource {
                    name,
                    value,
                    translatable: None,
                })
                .collect(),
        }
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        Catalog::from_entries(
            value.language,
            value.strings.into_iter().map(|sr| (sr.name, sr.value)),
        )
    }
}

fn name_attribute(e: &BytesStart) -> Result<(String, Option<bool>), Error> {
    let mut name = None;
    let mut translatable = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::parse(None, e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::parse(None, e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(value.to_string()),
            b"translatable" => translatable = Some(value == "true"),
            _ => {}
        }
    }
    let name = name.ok_or_else(|| Error::parse(None, "string tag missing 'name'"))?;
    Ok((name, translatable))
}

fn parse_string_resource<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<StringResource, Error> {
    let (name, translatable) = name_attribute(e)?;

    let mut buf = Vec::new();
    let mut value = String::new();
    let mut nested = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| {
                    Error::parse(Some(format!("key {}", name)), err.to_string())
                })?;
                value.push_str(&text);
            }
            Ok(Event::CData(e)) => value.push_str(&String::from_utf8_lossy(&e.into_inner())),
            // Inline markup such as <b> is kept as literal text.
            Ok(Event::Start(e)) => {
                nested += 1;
                value.push('<');
                value.push_str(&String::from_utf8_lossy(&e));
                value.push('>');
            }
            Ok(Event::Empty(e)) => {
                value.push('<');
                value.push_str(&String::from_utf8_lossy(&e));
                value.push_str("/>");
            }
            Ok(Event::End(e)) => {
                if nested == 0 {
                    break;
                }
                nested -= 1;
                value.push_str("</");
                value.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                value.push('>');
            }
            Ok(Event::Eof) => {
                return Err(Error::parse(
                    Some(format!("key {}", name)),
                    "unexpected end of document inside <string>",
                ));
            }
            Ok(_) => (),
            Err(e) => return Err(xml_error(xml_reader, e)),
        }
        buf.clear();
    }
    Ok(StringResource {
        name,
        value,
        translatable,
    })
}
