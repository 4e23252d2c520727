use std::fs;
use std::path::{Path, PathBuf};

use minishop_core::config::{env_source, AppConfig, ConfigOverrides};
use toml::Value;

use crate::commands::{load_config, CommandResult};

const COMMAND: &str = "config";

pub fn run(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> CommandResult {
    let config = match load_config(COMMAND, config_path.clone(), overrides.clone()) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = config_path.or_else(detect_config_path);
    CommandResult::text(render(&config, &overrides, config_file_path.as_deref()))
}

fn render(
    config: &AppConfig,
    overrides: &ConfigOverrides,
    config_file_path: Option<&Path>,
) -> String {
    let config_file_doc = load_config_file_doc(config_file_path);
    let source = |key_path: &str| {
        field_source(key_path, overrides, config_file_doc.as_ref(), config_file_path)
    };

    let mut lines =
        vec!["effective config (source precedence: cli > env > file > default):".to_string()];

    lines.push(render_line(
        "insights.currency_code",
        &config.insights.currency_code,
        source("insights.currency_code"),
    ));
    lines.push(render_line(
        "insights.rounding",
        config.insights.rounding.as_str(),
        source("insights.rounding"),
    ));
    lines.push(render_line(
        "ranking.mode",
        &format!("{:?}", config.ranking.mode),
        source("ranking.mode"),
    ));
    lines.push(render_line(
        "ranking.seed",
        &config.ranking.seed.map(|seed| seed.to_string()).unwrap_or_else(unset),
        source("ranking.seed"),
    ));
    lines.push(render_line(
        "ranking.fixed_value",
        &config.ranking.fixed_value.map(|value| value.to_string()).unwrap_or_else(unset),
        source("ranking.fixed_value"),
    ));
    lines.push(render_line("logging.level", &config.logging.level, source("logging.level")));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("minishop.toml"), PathBuf::from("config/minishop.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    overrides: &ConfigOverrides,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if overrides.sets(key_path) {
        return "cli".to_string();
    }

    if let Some(env_key) = env_source(key_path) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn unset() -> String {
    "<unset>".to_string()
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
