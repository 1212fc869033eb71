//! Unit base stats and balance upgrades read from a game core configuration file

use ahash::AHashMap;
use std::path::Path;

use crate::core::error::Result;
use crate::ini::structs::{coerce_int, parse_record, StructRecord};
use crate::ini::{load_config_file, ConfigDocument};
use crate::simulation::perks::{perk_name, PerkTable};

/// Base stat records keyed by unit type (`eChar_Sectoid`)
pub type BaseStats = AHashMap<String, StructRecord>;

const CHARACTERS_KEY: &str = "Characters";
const BALANCE_MODS_KEY: &str = "BalanceMods_Hard";

/// Everything the stat calculator needs from the game core file
#[derive(Debug, Clone, Default)]
pub struct GameCore {
    pub base_stats: BaseStats,
    pub upgrades: Vec<StructRecord>,
    pub perks: PerkTable,
}

impl GameCore {
    /// Collect `Characters` and `BalanceMods_Hard` entries from every section
    pub fn from_document(document: &ConfigDocument) -> Self {
        let mut core = GameCore::default();

        for (_, section) in document.sections() {
            if let Some(characters) = section.get(CHARACTERS_KEY) {
                for text in characters.values() {
                    let record = parse_record(text);
                    match record.get("iType").map(str::to_string) {
                        Some(unit_type) => {
                            core.base_stats.insert(unit_type, record);
                        }
                        None => tracing::debug!("Character entry without iType: {}", text),
                    }
                }
            }

            if let Some(mods) = section.get(BALANCE_MODS_KEY) {
                for text in mods.values() {
                    let record = parse_record(text);
                    if let Some((perk_id, name)) = perk_from_comment(&record, text) {
                        if perk_name(perk_id).is_none() && !core.perks.has_override(perk_id) {
                            core.perks.insert_override(perk_id, name);
                        }
                    }
                    core.upgrades.push(record);
                }
            }
        }

        tracing::debug!(
            "Game core: {} unit types, {} upgrades",
            core.base_stats.len(),
            core.upgrades.len()
        );
        core
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_document(&load_config_file(path)?))
    }
}

/// Perk named by a balance mod's trailing comment: `(..., iMobility=45) ;Regeneration. Heals`
fn perk_from_comment(record: &StructRecord, text: &str) -> Option<(u32, String)> {
    let perk_id = record
        .get("iMobility")
        .and_then(coerce_int)
        .filter(|&id| id > 0)
        .and_then(|id| u32::try_from(id).ok())?;

    let (_, comment) = text.split_once(';')?;
    let name = comment
        .split('?')
        .next()
        .and_then(|head| head.split('.').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    Some((perk_id, name.to_string()))
}
