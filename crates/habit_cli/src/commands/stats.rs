use crate::common::{print_json, with_store, CliResult};
use habit_core::model::palette::{target_frequency_label, DEFAULT_CATEGORIES, DEFAULT_COLORS};
use serde_json::json;
use std::path::Path;

pub fn run(config: Option<&Path>) -> CliResult<()> {
    with_store(config, |store| match store.stats() {
        Some(stats) => print_json(&serde_json::to_value(stats)?),
        None => {
            println!("no habits yet");
            Ok(())
        }
    })
}

pub fn presets() -> CliResult<()> {
    let frequencies: Vec<_> = (1..=7)
        .map(|days| json!({ "targetFrequency": days, "label": target_frequency_label(days) }))
        .collect();
    print_json(&json!({
        "categories": DEFAULT_CATEGORIES,
        "colors": DEFAULT_COLORS,
        "frequencies": frequencies,
    }))
}
