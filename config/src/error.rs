use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file is missing (see readme file for instructions): {}", .0.display())]
    FileMissing(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration value `{0}` is required")]
    MissingField(&'static str),

    #[error("No tags configured")]
    NoTags,

    #[error("Tag #{0} has no name")]
    UnnamedTag(usize),

    #[error("Tag {0} has no sound configured")]
    MissingSound(String),

    #[error("`{0}` must be greater than zero")]
    ZeroDuration(&'static str),
}
