mod settings;

use config::{Config, Environment, File};

use crate::config::settings::PartialSettings;
use crate::utils::Result;

pub use settings::{ClientSettings, LogSettings, ProducerSettings, Settings};

/// Path (without extension) of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Prefix of the environment variables that override configuration,
/// e.g. `KAFPUB_CLIENT__BROKERS=a:9092,b:9092`.
pub const ENV_PREFIX: &str = "KAFPUB";

/// Loads the configuration from the default file and environment variables.
pub fn load_config() -> Result<Settings> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Loads the configuration from `path` (optional, any format the `config`
/// crate recognises by extension) and `KAFPUB_*` environment variables,
/// then merges the result with default values.
pub fn load_config_from(path: &str) -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("client.brokers")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge_with_defaults())
}
