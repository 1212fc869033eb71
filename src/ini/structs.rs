//! Struct literals: the `(Key=Value,Key=Value)` values embedded in configuration entries

/// Field name/value pair in source order
pub type StructField = (String, String);

/// Parse a struct literal into its fields, keeping duplicates and source order
///
/// Anything after the first `;` is a comment. Segments without `=` are dropped.
pub fn parse_fields(text: &str) -> Vec<StructField> {
    let body = strip_comment(text).trim();
    let body = body.strip_prefix('(').unwrap_or(body);
    let body = body.strip_suffix(')').unwrap_or(body);

    body.split(',')
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parse a struct literal into a record; duplicate keys resolve last-wins
pub fn parse_record(text: &str) -> StructRecord {
    StructRecord::from_fields(parse_fields(text))
}

/// Write fields back as `(k=v,k=v)`
pub fn serialize_fields<K: AsRef<str>, V: AsRef<str>>(fields: &[(K, V)]) -> String {
    let body: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key.as_ref(), value.as_ref()))
        .collect();
    format!("({})", body.join(","))
}

/// Text before the first `;`
pub fn strip_comment(text: &str) -> &str {
    text.split_once(';').map_or(text, |(body, _)| body)
}

/// Lenient integer conversion: plain integers, or decimals truncated toward zero
pub fn coerce_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| value.trunc() as i64)
    })
}

/// Untyped field mapping parsed from a struct literal
///
/// Records resolved from a table also carry their position in that table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructRecord {
    fields: Vec<StructField>,
    id: Option<usize>,
}

impl StructRecord {
    /// Build from fields, later duplicates overwriting earlier ones in place
    pub fn from_fields(fields: impl IntoIterator<Item = StructField>) -> Self {
        let mut record = Self::default();
        for (key, value) in fields {
            record.set(key, value);
        }
        record
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    /// Position of this record within the table it was resolved from
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(coerce_int).unwrap_or(default)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_literal(&self) -> String {
        serialize_fields(&self.fields)
    }
}
