use crate::PlaybackError;
use std::{
    path::PathBuf,
    process::Command,
};

/// Speech commands, in order of preference. Each takes the text to say as its only argument.
const SPEECH_ENGINES: [&str; 3] = ["say", "espeak-ng", "espeak"];

/// Locate the platform's text-to-speech command.
pub(crate) fn find_engine() -> Result<PathBuf, PlaybackError> {
    SPEECH_ENGINES
        .iter()
        .find_map(|name| {
            which::which(name).ok().inspect(|path| {
                debug!(?path, "found speech engine {}", name);
            })
        })
        .ok_or_else(|| {
            PlaybackError::DeviceError(eyre::eyre!(
                "no text-to-speech command found (tried {})",
                SPEECH_ENGINES.join(", ")
            ))
        })
}

/// Say `text` and wait until the engine has finished.
pub(crate) fn speak(text: &str) -> Result<(), PlaybackError> {
    let engine = find_engine()?;
    let status = Command::new(&engine)
        .arg(text)
        .status()
        .map_err(|err| PlaybackError::DeviceError(eyre::eyre!("failed to run {}: {err}", engine.display())))?;

    if !status.success() {
        return Err(PlaybackError::DeviceError(eyre::eyre!(
            "{} exited with {status}",
            engine.display()
        )));
    }
    Ok(())
}
