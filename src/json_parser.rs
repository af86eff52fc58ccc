use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::types::{AccountRecord, AccountType, Amount, CardId, Pin};

/// A single card entry of the input JSON
///
/// Older ledger files name the balance map `accounts_to_balance`, both spellings are accepted.
#[derive(Debug, Deserialize)]
struct RawAccountRecord {
    #[serde(rename = "PIN")]
    pin: Pin,

    #[serde(alias = "accounts_to_balance")]
    accounts: HashMap<AccountType, Amount>,
}

impl From<RawAccountRecord> for AccountRecord {
    fn from(raw: RawAccountRecord) -> Self {
        let RawAccountRecord { pin, accounts } = raw;
        AccountRecord { pin, accounts }
    }
}

/// Read the whole ledger from a JSON document mapping card identifiers to their records
pub fn read_ledger(reader: impl std::io::Read) -> Result<HashMap<CardId, AccountRecord>> {
    let raw: HashMap<CardId, RawAccountRecord> = serde_json::from_reader(reader)?;

    Ok(raw
        .into_iter()
        .map(|(card, record)| (card, record.into()))
        .collect())
}

/// Read the ledger from the JSON file at `path`
pub fn load_ledger(path: impl AsRef<Path>) -> Result<HashMap<CardId, AccountRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open ledger file {}", path.display()))?;
    let ledger = read_ledger(std::io::BufReader::new(file))
        .with_context(|| format!("Cannot parse ledger file {}", path.display()))?;

    debug!("Loaded {} cards from {}", ledger.len(), path.display());
    Ok(ledger)
}
