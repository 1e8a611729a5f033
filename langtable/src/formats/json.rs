//! Support for flat JSON localization files: one object mapping keys to
//! string values, keys kept in file order.

use std::io::{BufRead, Write};

use serde_json::{Map, Value};

use crate::{error::Error, traits::Parser, types::Catalog};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub language: String,
    pub entries: Vec<(String, String)>,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let object: Map<String, Value> = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                Error::Io(e.into())
            } else {
                Error::parse(
                    Some(format!("line {}, column {}", e.line(), e.column())),
                    e.to_string(),
                )
            }
        })?;

        let mut entries = Vec::with_capacity(object.len());
        for (key, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::parse(
                        Some(format!("key {}", key)),
                        "nested values are not supported",
                    ));
                }
            };
            entries.push((key, value));
        }

        Ok(Format {
            language: String::new(),
            entries,
        })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        serde_json::to_writer_pretty(&mut writer, &object).map_err(std::io::Error::from)?;
        writer.write_all(b"\n")?;
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
