use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "todo";
const ENV_PREFIX: &str = "TODO";

/// Settings for the local task database.
///
/// Values come from an optional `todo.toml` in the working directory and are
/// overridden by `TODO_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from `todo.toml` (if present) and the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name(CONFIG_FILE).required(false))
                .add_source(config::Environment::with_prefix(ENV_PREFIX)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

fn default_database_url() -> String {
    "sqlite://todo_database.db?mode=rwc".to_string()
}

// SQLite has a single writer; more connections only add lock contention.
fn default_max_connections() -> u32 {
    1
}
