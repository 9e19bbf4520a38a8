//! Shared bootstrap for subcommands: config, logging, database, store.

use habit_core::db::open_db;
use habit_core::{
    init_from_config, EngineConfig, HabitStore, SqliteSnapshotStore, SystemClock,
};
use std::path::Path;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

pub type CliStore<'conn> = HabitStore<SqliteSnapshotStore<'conn>, SystemClock>;

pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_default()?,
    };
    Ok(config)
}

/// Opens the configured store and runs `action` against it.
///
/// Logging failures are reported on stderr and do not abort the command.
pub fn with_store<T>(
    config_path: Option<&Path>,
    action: impl FnOnce(&mut CliStore<'_>) -> CliResult<T>,
) -> CliResult<T> {
    let config = load_config(config_path)?;
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let conn = open_db(config.database_path())?;
    let persistence = SqliteSnapshotStore::try_new(&conn)?;
    let mut store = HabitStore::open_with(persistence, SystemClock, config.store_options());

    let output = action(&mut store)?;
    if let Some(message) = store.last_save_error() {
        return Err(format!("changes were applied but not saved: {message}").into());
    }
    Ok(output)
}

pub fn print_json(value: &serde_json::Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
