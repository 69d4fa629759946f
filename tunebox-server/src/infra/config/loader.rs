use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use url::Url;

use super::{
    models::{
        Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig,
        StorageConfig,
    },
    sources::{EnvConfig, FileConfig, FileDatabaseConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["tunebox.toml", "config/tunebox.toml"];

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_STORAGE_ROOT: &str = "./music_files";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DATABASE_PORT: u16 = 5432;

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Builds a [`Config`] from `.env`, environment variables, an optional TOML
/// file and built-in defaults, in that order of precedence.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = compose_config(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if metadata.config_path.is_none() {
        warnings.push_with_hint(
            "No tunebox.toml detected; using environment variables and defaults",
            "Create tunebox.toml or set TUNEBOX_CONFIG to point at one",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        storage: file_storage,
        cors: file_cors,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let database = DatabaseConfig {
        url: resolve_database_url(&env, &file_database)?,
        max_connections: env
            .database_max_connections
            .or(file_database.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
    };

    let storage = StorageConfig {
        root: env
            .storage_root
            .clone()
            .or(file_storage.root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT)),
        max_upload_bytes: env
            .max_upload_bytes
            .or(file_storage.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .clone()
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

    let config = Config {
        server,
        database,
        storage,
        cors,
        dev_mode,
        metadata,
    };

    let guard_warnings = validation::apply_guard_rails(&config)?;
    warnings.extend(guard_warnings);

    Ok((config, warnings))
}

fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(url) = env
        .database_url
        .clone()
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(Some(url));
    }

    let host = non_blank(&env.database_host);
    let user = non_blank(&env.database_user);
    let name = non_blank(&env.database_name);

    if let (Some(host), Some(user), Some(name)) = (host, user, name) {
        let port = env.database_port.unwrap_or(DEFAULT_DATABASE_PORT);
        let mut url = Url::parse(&format!("postgresql://{host}:{port}/{name}"))
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
        url.set_username(&user).map_err(|_| {
            ConfigLoadError::InvalidDatabaseUsername {
                username: user.clone(),
            }
        })?;
        if let Some(password) = non_blank(&env.database_password) {
            url.set_password(Some(&password))
                .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
        }
        return Ok(Some(url.to_string()));
    }

    if let Some(stored_url) = non_blank(&file_database.url) {
        let mut parsed = Url::parse(stored_url.trim())
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
        if parsed.password().is_none()
            && let Some(password) = non_blank(&env.database_password)
        {
            parsed
                .set_password(Some(&password))
                .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
        }
        return Ok(Some(parsed.to_string()));
    }

    Ok(None)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid database URL")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },
    #[error("invalid database username '{username}'")]
    InvalidDatabaseUsername { username: String },
    #[error("failed to encode database password into URL")]
    InvalidDatabasePassword,
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
