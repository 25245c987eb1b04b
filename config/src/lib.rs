#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod error;
mod tag_config;

pub use app_config::{
    get_config_dir,
    get_config_file,
    CONFIG_ENV,
    DEFAULT_CONFIG_FILE,
};
pub use args::{
    Args,
    Mode,
};
pub use error::ConfigError;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    ffi::OsStr,
    fmt,
    path::Path,
    time::Duration,
};
pub use tag_config::{
    AlertMode,
    TagConfig,
    SPEAK_MARKER,
};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://dashboard.signalsciences.net/api/v0";
pub const DEFAULT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything the poller needs: credentials, the site to watch and the tags to alert on.
///
/// Keys are accepted both in snake case and in the capitalised form used by older theme files
/// (`Username`, `CorpName`, `SiteName`, `Tags`).
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(default, alias = "Password")]
    pub password: String,
    #[serde(default, alias = "corpname", alias = "CorpName", alias = "corp_name")]
    pub corp: String,
    #[serde(default, alias = "sitename", alias = "SiteName", alias = "site_name")]
    pub site: String,
    #[serde(default, alias = "Tags")]
    pub tags: Vec<TagConfig>,
    pub api_url: Url,
    pub interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("corp", &self.corp)
            .field("site", &self.site)
            .field("tags", &self.tags)
            .field("api_url", &self.api_url.as_str())
            .field("interval_secs", &self.interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load the config file selected by [`get_config_file`] and apply the `SIGSCI_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = get_config_file();
        Ok(Self::from_file(&file)?.with_overrides(EnvOverrides::from_env()))
    }

    /// Load a JSON config file (YAML if the extension says so) without environment overrides.
    #[instrument(level = "debug", skip_all, fields(file = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileMissing(path.to_path_buf()));
        }

        let format = match path.extension().and_then(OsStr::to_str) {
            Some("yaml" | "yml") => config::FileFormat::Yaml,
            _ => config::FileFormat::Json,
        };

        let cfg: Self = config::Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("interval_secs", DEFAULT_INTERVAL_SECS)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .add_source(config::File::from(path).format(format).required(true))
            .build()?
            .try_deserialize()?;

        debug!(tags = cfg.tags.len(), "loaded configuration");
        Ok(cfg)
    }

    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        let EnvOverrides {
            username,
            password,
            corp,
            site,
        } = overrides;
        if let Some(username) = username {
            debug!(%username, "username overridden from environment");
            self.username = username;
        }
        if let Some(password) = password {
            self.password = password;
        }
        if let Some(corp) = corp {
            debug!(%corp, "corp overridden from environment");
            self.corp = corp;
        }
        if let Some(site) = site {
            debug!(%site, "site overridden from environment");
            self.site = site;
        }
        self
    }

    /// Polling needs credentials, a corp and a site on top of the tag list.
    pub fn validate_for_run(&self) -> Result<(), ConfigError> {
        let required = [
            ("username", &self.username),
            ("password", &self.password),
            ("corp", &self.corp),
            ("site", &self.site),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::MissingField(*name));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("interval_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_secs"));
        }
        self.validate_tags()
    }

    /// Self-test only plays the sounds, so only the tags matter.
    pub fn validate_for_self_test(&self) -> Result<(), ConfigError> {
        self.validate_tags()
    }

    fn validate_tags(&self) -> Result<(), ConfigError> {
        if self.tags.is_empty() {
            return Err(ConfigError::NoTags);
        }
        for (index, tag) in self.tags.iter().enumerate() {
            if tag.name.trim().is_empty() {
                return Err(ConfigError::UnnamedTag(index));
            }
            if tag.sound.trim().is_empty() {
                return Err(ConfigError::MissingSound(tag.name.clone()));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Credential and site overrides read from `SIGSCI_EMAIL`, `SIGSCI_PASSWORD`, `SIGSCI_CORP` and `SIGSCI_SITE`.
/// Empty variables do not override.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub corp: Option<String>,
    pub site: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            username: get("SIGSCI_EMAIL"),
            password: get("SIGSCI_PASSWORD"),
            corp: get("SIGSCI_CORP"),
            site: get("SIGSCI_SITE"),
        }
    }
}
