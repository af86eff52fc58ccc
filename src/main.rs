#![forbid(unsafe_code)]

use anyhow::{anyhow, Result};

use atm_ledger::{atm::Atm, console};

/// Used when no ledger path is given on the command line
const LEDGER_PATH_VARIABLE: &str = "ATM_LEDGER";

fn main() -> Result<()> {
    pretty_env_logger::init();

    let path = std::env::args()
        .nth(1) // skip executable name
        .or_else(|| std::env::var(LEDGER_PATH_VARIABLE).ok())
        .ok_or_else(|| anyhow!("Missing ledger file (argument or {})", LEDGER_PATH_VARIABLE))?;

    let mut atm = Atm::from_path(path)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    console::run(&mut atm, stdin.lock(), stdout.lock())?;

    Ok(())
}
