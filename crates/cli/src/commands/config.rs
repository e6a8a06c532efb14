use std::env;
use std::fs;
use std::path::Path;

use storefront_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

/// Effective configuration, one line per key, with where each value came from.
pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: [(&str, String, &str); 11] = [
        ("database.url", config.database.url.clone(), "STOREFRONT_DATABASE_URL"),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            "STOREFRONT_DATABASE_MAX_CONNECTIONS",
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            "STOREFRONT_DATABASE_TIMEOUT_SECS",
        ),
        ("server.bind_address", config.server.bind_address.clone(), "STOREFRONT_SERVER_BIND_ADDRESS"),
        ("server.port", config.server.port.to_string(), "STOREFRONT_SERVER_PORT"),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            "STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        ),
        ("client.base_url", config.client.base_url.clone(), "STOREFRONT_CLIENT_BASE_URL"),
        (
            "client.timeout_secs",
            config.client.timeout_secs.to_string(),
            "STOREFRONT_CLIENT_TIMEOUT_SECS",
        ),
        ("logging.level", config.logging.level.clone(), "STOREFRONT_LOGGING_LEVEL"),
        ("logging.format", format!("{:?}", config.logging.format), "STOREFRONT_LOGGING_FORMAT"),
        ("config.file", config_file_label(config_file_path.as_deref()), ""),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_key) in entries {
        let source = if key == "config.file" {
            "discovery".to_string()
        } else {
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
        };
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

fn config_file_label(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| "<none>".to_string())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            return format!("file ({})", config_file_label(config_file_path));
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
