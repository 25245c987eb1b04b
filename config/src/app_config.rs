use directories::ProjectDirs;
use std::{
    env,
    path::{
        Path,
        PathBuf,
    },
};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "SIGSCI_SOUNDS_CONFIG";

/// Relative path used when [`CONFIG_ENV`] is not set.
pub const DEFAULT_CONFIG_FILE: &str = "themes/sigsci-sounds-osx.conf";

const CONFIG_FILE_NAME: &str = "sigsci-sounds.conf";

lazy_static::lazy_static! {
    static ref CONFIG_FILE: Option<PathBuf> = env::var(CONFIG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from);
}

/// The configuration file to load: `$SIGSCI_SOUNDS_CONFIG`, then the bundled theme path, then the per-user
/// config directory.
pub fn get_config_file() -> PathBuf {
    resolve_config_file(CONFIG_FILE.clone(), Path::new(DEFAULT_CONFIG_FILE), &get_config_dir())
}

pub(crate) fn resolve_config_file(from_env: Option<PathBuf>, default_file: &Path, config_dir: &Path) -> PathBuf {
    if let Some(file) = from_env {
        return file;
    }
    if default_file.exists() {
        return default_file.to_path_buf();
    }
    config_dir.join(CONFIG_FILE_NAME)
}

pub fn get_config_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "signalsciences", env!("CARGO_PKG_NAME"))
}
