use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("MAX_UPLOAD_BYTES must be greater than zero")]
    ZeroUploadLimit,
    #[error("DATABASE_MAX_CONNECTIONS must be greater than zero")]
    ZeroPoolSize,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.storage.max_upload_bytes == 0 {
        return Err(ConfigGuardRailError::ZeroUploadLimit);
    }
    if config.database.max_connections == 0 {
        return Err(ConfigGuardRailError::ZeroPoolSize);
    }

    if config.cors.is_wildcard_included() {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::DangerousCorsWildcard);
        }
        warnings.push("CORS allows any origin (DEV_MODE)");
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "no database connection configured",
            "Set DATABASE_URL or DATABASE_HOST, DATABASE_USER and DATABASE_NAME",
        );
    }

    Ok(warnings)
}
