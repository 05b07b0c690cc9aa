use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub form: FormConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    // When off, the durable store lives in process memory
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub url: String,
    pub sentinel_enabled: bool,
    pub sentinel_url: Option<String>,
    // Prepended to every durable key, empty by default
    #[serde(default)]
    pub namespace: String,
}

fn enabled_by_default() -> bool {
    true
}

/// Fixed keys the form reads and writes in both stores.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    pub users_key: String,
    pub marker_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_key: "listaUsuarios".to_string(),
            marker_key: "usuarioLogado".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    // Long-lived cookie naming the client's slice of the durable store
    #[serde(default = "default_client_cookie_name")]
    pub client_cookie_name: String,
    pub secure: bool,
}

fn default_client_cookie_name() -> String {
    "client_id".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            client_cookie_name: default_client_cookie_name(),
            secure: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FormConfig {
    pub max_body_size: usize, // in bytes
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { max_body_size: 16 * 1024 }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
