//! Line-oriented `[Section]` / `Key=Value` / `Key[N]=Value` text format

use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::delimited;
use nom::{IResult, Parser};

use crate::ini::document::{ConfigDocument, ShapeConflict, Value};

/// Parse configuration text
///
/// Inline `;` comments are kept by re-appending them to the value, so regenerating
/// the document writes them back. Lines before the first section header are dropped.
pub fn parse(text: &str) -> ConfigDocument {
    let mut document = ConfigDocument::new();
    let mut current: Option<String> = None;

    for raw_line in text.lines() {
        let (content, comment) = match raw_line.split_once(';') {
            Some((content, comment)) => (content, Some(comment)),
            None => (raw_line, None),
        };

        let line = content.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = section_header(line) {
            document.section_or_insert(name);
            current = Some(name.to_string());
            continue;
        }

        let Some(section_name) = current.as_deref() else {
            continue;
        };
        let Some((raw_key, raw_value)) = line.split_once('=') else {
            continue;
        };

        let key = raw_key.trim();
        let mut value = raw_value.trim().to_string();
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            value.push(';');
            value.push_str(comment);
        }

        let section = document.section_or_insert(section_name);
        let stored = match indexed_key(key) {
            Some((name, index)) => section.insert_indexed(name, index, value),
            None => section.push_list(key, value),
        };

        if let Err(conflict) = stored {
            let expected = match conflict {
                ShapeConflict::ExpectedList => "Key=Value",
                ShapeConflict::ExpectedIndexed => "Key[N]=Value",
            };
            tracing::warn!(
                "[{}] '{}' mixes value shapes; keeping the first ({}) and ignoring this line",
                section_name,
                key,
                expected
            );
        }
    }

    document
}

/// Write a document back to text, one blank line after every section
pub fn generate(document: &ConfigDocument) -> String {
    let mut out = String::new();

    for (name, section) in document.sections() {
        out.push_str(&format!("[{}]\n", name));
        for (key, value) in section.iter() {
            match value {
                Value::List(items) => {
                    for item in items {
                        out.push_str(&format!("{}={}\n", key, item));
                    }
                }
                Value::IndexedMap(items) => {
                    for (index, item) in items {
                        out.push_str(&format!("{}[{}]={}\n", key, index, item));
                    }
                }
            }
        }
        out.push('\n');
    }

    out
}

/// `[Name]` -> `Name`
fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|name| !name.is_empty())
}

/// `Name[12]` -> (`Name`, 12); the last bracket pair is the index
fn indexed_key(key: &str) -> Option<(&str, u32)> {
    let open = key.rfind('[')?;
    let (name, suffix) = key.split_at(open);
    if name.is_empty() {
        return None;
    }

    let parsed: IResult<&str, u32> = all_consuming(delimited(
        char('['),
        map_res(digit1, |digits: &str| digits.parse::<u32>()),
        char(']'),
    ))
    .parse(suffix);

    parsed.ok().map(|(_, index)| (name, index))
}
