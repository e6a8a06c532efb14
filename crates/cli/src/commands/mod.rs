pub mod config;
pub mod create;
pub mod delete;
pub mod list;
pub mod migrate;
pub mod render;
pub mod update;

use serde::Serialize;
use tokio::runtime::Runtime;

use storefront_client::{CatalogClient, ClientError, HttpCatalogApi};
use storefront_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
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

pub(crate) fn load_config(
    command: &str,
    base_url: Option<String>,
) -> Result<AppConfig, CommandResult> {
    let options = LoadOptions {
        overrides: ConfigOverrides { client_base_url: base_url, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    AppConfig::load(options).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn runtime(command: &str) -> Result<Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

/// Config, runtime and a client that has already fetched the catalog.
pub(crate) fn loaded_client(
    command: &str,
    base_url: Option<String>,
) -> Result<(Runtime, CatalogClient<HttpCatalogApi>), CommandResult> {
    let config = load_config(command, base_url)?;
    let runtime = runtime(command)?;
    let api = HttpCatalogApi::from_config(&config.client)
        .map_err(|error| client_failure(command, error))?;

    let mut client = CatalogClient::new(api);
    runtime.block_on(client.load()).map_err(|error| client_failure(command, error))?;
    Ok((runtime, client))
}

pub(crate) fn client_failure(command: &str, error: ClientError) -> CommandResult {
    let (error_class, exit_code) = match &error {
        ClientError::Invalid(_) => ("validation", 6),
        ClientError::Api { status: 400, .. } => ("validation", 6),
        ClientError::Api { status: 404, .. } | ClientError::UnknownProduct(_) => ("not_found", 4),
        ClientError::Api { .. } => ("api", 4),
        ClientError::Transport(_) => ("connectivity", 4),
        ClientError::Protocol(_) => ("protocol", 4),
    };
    CommandResult::failure(command, error_class, error.to_string(), exit_code)
}
