use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
}

/// Storage settings for the strategy persistence layer.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Where the SQLite database lives: a file path, `:memory:` for an
    /// ephemeral database, or a full `sqlite:` URL.
    pub location: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long to wait for a pooled connection before giving up.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap()
    }

    #[test]
    fn pool_settings_default_when_omitted() {
        let config = parse("[database]\nlocation = \":memory:\"\n");
        assert_eq!(config.database.location, ":memory:");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout_secs, 5);
    }

    #[test]
    fn pool_settings_are_read_when_present() {
        let config = parse(
            "[database]\nlocation = \"run.db\"\nmax_connections = 12\nacquire_timeout_secs = 30\n",
        );
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.database.acquire_timeout_secs, 30);
    }
}
