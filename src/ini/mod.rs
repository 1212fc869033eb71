//! Configuration text codec and struct-literal mini-format

pub mod codec;
pub mod document;
pub mod structs;

pub use codec::{generate, parse};
pub use document::{ConfigDocument, OrderedMap, Section, ShapeConflict, Value};
pub use structs::{parse_fields, parse_record, serialize_fields, StructField, StructRecord};

use std::fs;
use std::path::Path;

use crate::core::error::Result;

/// Parse configuration text; absent text yields an empty document
pub fn parse_config<'a>(text: impl Into<Option<&'a str>>) -> ConfigDocument {
    match text.into() {
        Some(text) => parse(text),
        None => {
            tracing::warn!("parse_config called without text; returning an empty document");
            ConfigDocument::new()
        }
    }
}

pub fn generate_config(document: &ConfigDocument) -> String {
    generate(document)
}

pub fn parse_struct_fields(text: &str) -> Vec<StructField> {
    parse_fields(text)
}

pub fn parse_struct_record(text: &str) -> StructRecord {
    parse_record(text)
}

/// Read and parse a configuration file; invalid UTF-8 is replaced rather than rejected
pub fn load_config_file(path: &Path) -> Result<ConfigDocument> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let document = parse(&text);
    tracing::debug!("Loaded {} sections from {}", document.len(), path.display());
    Ok(document)
}

pub fn write_config_file(path: &Path, document: &ConfigDocument) -> Result<()> {
    fs::write(path, generate(document))?;
    Ok(())
}
