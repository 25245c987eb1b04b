#[macro_use]
extern crate tracing;

mod error;
mod speech;

pub use error::PlaybackError;
use rodio::{
    Decoder,
    OutputStream,
    Sink,
};
use sigsci_sounds_config::{
    AlertMode,
    TagConfig,
};
use std::{
    ffi::OsStr,
    fs::File,
    io::BufReader,
    path::{
        Path,
        PathBuf,
    },
};

/// Raises the alert configured for a tag. Implementations block until the alert has finished.
pub trait AlertPlayer: Send + Sync {
    /// Check that the alert can be raised without raising it.
    fn resolve(&self, tag: &TagConfig) -> Result<Resource, PlaybackError>;

    fn play(&self, tag: &TagConfig) -> Result<(), PlaybackError>;
}

/// What a tag's alert resolves to, picked by file extension or the speak marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Wav(PathBuf),
    Mp3(PathBuf),
    /// Any other audio file, format detected from its content.
    Audio(PathBuf),
    Speech(String),
}

impl Resource {
    /// Files must exist, speech is not checked here.
    pub fn from_tag(tag: &TagConfig) -> Result<Self, PlaybackError> {
        match tag.alert_mode() {
            AlertMode::SpeakText(text) => Ok(Resource::Speech(text)),
            AlertMode::PlayFile(path) => {
                if !path.is_file() {
                    return Err(PlaybackError::ResourceMissing(path));
                }
                let extension = path
                    .extension()
                    .and_then(OsStr::to_str)
                    .map(str::to_ascii_lowercase);
                Ok(match extension.as_deref() {
                    Some("wav") => Resource::Wav(path),
                    Some("mp3") => Resource::Mp3(path),
                    _ => Resource::Audio(path),
                })
            }
        }
    }
}

/// Plays sound files on the default output device and speaks text with the system speech command.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl AlertPlayer for RodioPlayer {
    fn resolve(&self, tag: &TagConfig) -> Result<Resource, PlaybackError> {
        let resource = Resource::from_tag(tag)?;
        match &resource {
            Resource::Speech(_) => {
                speech::find_engine()?;
            }
            Resource::Wav(path) | Resource::Mp3(path) | Resource::Audio(path) => {
                decode(&resource, path)?;
            }
        }
        Ok(resource)
    }

    #[instrument(level = "debug", skip_all, fields(tag = %tag.name))]
    fn play(&self, tag: &TagConfig) -> Result<(), PlaybackError> {
        let resource = Resource::from_tag(tag)?;
        let path = match &resource {
            Resource::Speech(text) => {
                debug!(%text, "speaking");
                return speech::speak(text);
            }
            Resource::Wav(path) | Resource::Mp3(path) | Resource::Audio(path) => path,
        };

        let source = decode(&resource, path)?;

        // The stream has to outlive the sink, dropping it silences playback.
        let (_stream, handle) = OutputStream::try_default()
            .map_err(|err| PlaybackError::DeviceError(eyre::eyre!("failed to open output stream: {err}")))?;
        let sink = Sink::try_new(&handle)
            .map_err(|err| PlaybackError::DeviceError(eyre::eyre!("failed to create audio sink: {err}")))?;

        debug!(?path, "playing");
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

pub(crate) fn decode(resource: &Resource, path: &Path) -> Result<Decoder<BufReader<File>>, PlaybackError> {
    let file = File::open(path).map_err(|_| PlaybackError::ResourceMissing(path.to_path_buf()))?;
    let reader = BufReader::new(file);
    let decoded = match resource {
        Resource::Wav(_) => Decoder::new_wav(reader),
        Resource::Mp3(_) => Decoder::new_mp3(reader),
        _ => Decoder::new(reader),
    };
    decoded.map_err(|source| PlaybackError::DecodeError {
        path: path.to_path_buf(),
        source,
    })
}
