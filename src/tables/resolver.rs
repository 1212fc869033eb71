//! Resolve a base table plus its monthly modifier overlay into effective records

use crate::core::config::STRATEGY_AI_SECTION;
use crate::ini::structs::{parse_record, strip_comment, StructRecord};
use crate::ini::{ConfigDocument, Value};

/// Modifier values meaning "leave this field alone" in unit group tables
pub const GROUP_NO_CHANGE: &[&str] = &["-1", "-2"];

/// Modifier values meaning "leave this field alone" in pod number and pod type tables
pub const NO_CHANGE: &[&str] = &["-1"];

/// Fields of a modifier that address it rather than override anything
const MODIFIER_KEYS: [&str; 2] = ["ID", "Month"];

/// Raw value of a strategy AI table
pub fn table<'a>(document: &'a ConfigDocument, key: &str) -> Option<&'a Value> {
    document.get(STRATEGY_AI_SECTION, key)
}

/// First value of a scalar setting, without its inline comment
pub fn setting<'a>(document: &'a ConfigDocument, key: &str) -> Option<&'a str> {
    table(document, key)
        .and_then(Value::first)
        .map(|raw| strip_comment(raw).trim())
}

/// Parse every struct of a table, tagging each with its record id
pub fn table_records(document: &ConfigDocument, key: &str) -> Vec<StructRecord> {
    table(document, key)
        .map(|value| {
            value
                .indexed_values()
                .into_iter()
                .map(|(id, text)| parse_record(text).with_id(id))
                .collect()
        })
        .unwrap_or_default()
}

/// Modifiers of a table that are active by `month`, in table order
///
/// A modifier without a readable `Month` never activates.
pub fn monthly_modifiers(document: &ConfigDocument, key: &str, month: u32) -> Vec<StructRecord> {
    table_records(document, key)
        .into_iter()
        .filter(|modifier| {
            modifier
                .get("Month")
                .and_then(crate::ini::structs::coerce_int)
                .is_some_and(|active_from| active_from <= i64::from(month))
        })
        .collect()
}

/// Copy a modifier's override fields onto `target`, skipping no-change sentinels
pub fn apply_modifier(target: &mut StructRecord, modifier: &StructRecord, no_change: &[&str]) {
    for (key, value) in modifier.fields() {
        if MODIFIER_KEYS.contains(&key) || no_change.contains(&value) {
            continue;
        }
        target.set(key, value);
    }
}

/// Effective records of `base_key` once every modifier active by `month_cutoff` is applied
///
/// Modifiers target records by their `ID` field. Later modifiers override earlier ones;
/// a modifier whose `ID` matches no record is ignored.
pub fn resolve(
    document: &ConfigDocument,
    base_key: &str,
    modifier_key: &str,
    month_cutoff: u32,
) -> Vec<StructRecord> {
    let mut records = table_records(document, base_key);

    for modifier in monthly_modifiers(document, modifier_key, month_cutoff) {
        let target_id = modifier
            .get("ID")
            .and_then(crate::ini::structs::coerce_int)
            .and_then(|id| usize::try_from(id).ok());

        let target = target_id.and_then(|id| records.iter_mut().find(|r| r.id() == Some(id)));
        match target {
            Some(record) => apply_modifier(record, &modifier, GROUP_NO_CHANGE),
            None => tracing::debug!(
                "{}: modifier {:?} targets no record of {}",
                modifier_key,
                modifier.get("ID"),
                base_key
            ),
        }
    }

    records
}
