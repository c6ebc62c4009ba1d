//! Runner configuration from environment variables.

use anyhow::{Context, Result};
use landmine_core::RunnerConfig;
use std::str::FromStr;

/// Defaults overridden by any `LANDMINE_*` variables that are set
pub fn load() -> Result<RunnerConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<RunnerConfig> {
    let mut config = RunnerConfig::default();

    if let Some(seed) = parse(&lookup, "LANDMINE_SEED")? {
        config.sim.seed = seed;
    }
    if let Some(size) = parse(&lookup, "LANDMINE_GRID_SIZE")? {
        config.sim.world.grid_size = size;
    }
    if let Some(count) = parse(&lookup, "LANDMINE_COUNT")? {
        config.sim.world.landmine_count = count;
    }
    if let Some(ticks) = parse(&lookup, "LANDMINE_MAX_TICKS")? {
        config.max_ticks = ticks;
    }
    if let Some(every) = parse(&lookup, "LANDMINE_REPORT_EVERY")? {
        config.report_every = every;
    }
    if let Some(print_map) = parse(&lookup, "LANDMINE_PRINT_MAP")? {
        config.print_map = print_map;
    }
    if let Some(path) = lookup("LANDMINE_RESULT_PATH").filter(|path| !path.is_empty()) {
        config.result_path = Some(path);
    }

    config.sim.validate()?;
    Ok(config)
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {key}: {raw:?}"))
        })
        .transpose()
}
