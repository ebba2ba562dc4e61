//! tlens config - Show effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{self, robot_ok};
use crate::config::Config;
use crate::error::{LensError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted key to print (e.g. `scoring.diversity_weight`)
    pub key: Option<String>,

    /// Print the global config file location and exit
    #[arg(long)]
    pub path: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::global_path()
            .ok_or_else(|| LensError::MissingConfig("no config directory on this platform".into()))?;
        if ctx.robot_mode {
            return output::emit_json(&robot_ok(path.display().to_string()));
        }
        println!("{}", path.display());
        return Ok(());
    }

    match &args.key {
        Some(key) => get_key(ctx, key),
        None => emit_config(ctx),
    }
}

fn emit_config(ctx: &AppContext) -> Result<()> {
    if ctx.robot_mode {
        return output::emit_json(&robot_ok(&ctx.config));
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| LensError::Config(format!("render config: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn get_key(ctx: &AppContext, key: &str) -> Result<()> {
    let value = config_value_at(&ctx.config, key)?;
    if ctx.robot_mode {
        return output::emit_json(&robot_ok(&value));
    }
    println!("{}", format_value(&value));
    Ok(())
}

fn config_value_at(config: &Config, key: &str) -> Result<toml::Value> {
    let doc = toml::Value::try_from(config)
        .map_err(|err| LensError::Config(format!("serialize config: {err}")))?;
    get_path(&doc, key)
}

fn get_path(doc: &toml::Value, key: &str) -> Result<toml::Value> {
    let mut current = doc;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| LensError::NotFound(format!("config key: {key}")))?;
    }
    Ok(current.clone())
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_lookup_reads_nested_values() {
        let value = config_value_at(&Config::default(), "evidence.max_snippets").unwrap();
        assert_eq!(format_value(&value), "5");

        let value = config_value_at(&Config::default(), "scoring.diversity_weight").unwrap();
        assert_eq!(value.as_float(), Some(0.45));
    }

    #[test]
    fn unknown_key_is_not_found() {
        let err = config_value_at(&Config::default(), "scoring.nope").unwrap_err();
        assert!(matches!(err, LensError::NotFound(_)));
    }
}
