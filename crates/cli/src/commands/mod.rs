pub mod config;
pub mod report;
pub mod savings;
pub mod vendors;

use std::path::{Path, PathBuf};

use minishop_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use minishop_core::{ApplicationError, DomainError};
use serde::Serialize;
use serde_json::Value;

use crate::feed::{load_feed, Feed};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub feed_path: PathBuf,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

fn correlation_id(command: &str) -> String {
    format!("cli-{command}")
}

pub fn load_config(
    command: &str,
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<AppConfig, CommandResult> {
    let require_file = config_path.is_some();
    AppConfig::load(LoadOptions { config_path, require_file, overrides }).map_err(|error| {
        let interface = ApplicationError::Configuration(error.to_string())
            .into_interface(correlation_id(command));
        tracing::warn!(
            event_name = "cli.config.load_failed",
            command,
            correlation_id = interface.correlation_id(),
            "configuration could not be loaded"
        );
        CommandResult::failure(
            command,
            "config_validation",
            format!("{} ({error})", interface.user_message()),
            2,
        )
    })
}

pub fn invalid_argument(command: &str, error: DomainError) -> CommandResult {
    let detail = error.to_string();
    let interface = ApplicationError::from(error).into_interface(correlation_id(command));
    tracing::warn!(
        event_name = "cli.arguments.rejected",
        command,
        correlation_id = interface.correlation_id(),
        "command arguments were rejected"
    );
    CommandResult::failure(
        command,
        "invalid_argument",
        format!("{} ({detail})", interface.user_message()),
        2,
    )
}

pub(crate) fn load_feed_for(command: &str, path: &Path) -> Result<Feed, CommandResult> {
    load_feed(path).map_err(|error| {
        let interface =
            ApplicationError::Feed(error.to_string()).into_interface(correlation_id(command));
        tracing::warn!(
            event_name = "cli.feed.load_failed",
            command,
            correlation_id = interface.correlation_id(),
            error_class = error.error_class(),
            "feed could not be loaded"
        );
        CommandResult::failure(
            command,
            error.error_class(),
            format!("{} ({error})", interface.user_message()),
            error.exit_code(),
        )
    })
}
