use clap::{
    Parser,
    ValueEnum,
};
use strum::Display;

/// Plays a sound whenever Signal Sciences reports anomalies for one of the configured tags.
#[derive(Parser, Debug, Clone)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// `run` polls the API continuously, `test` plays every configured sound once and exits.
    #[arg(value_enum, default_value_t = Mode::Run)]
    pub mode: Mode,
}

#[derive(Debug, Default, Clone, Copy, Display, ValueEnum, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Run,
    Test,
}

pub fn version() -> String {
    let version = clap::crate_version!();
    let config_file = crate::get_config_file().display().to_string();

    format!(
        "\
{version}

Config file: {config_file}"
    )
}
