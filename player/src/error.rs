use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Sound file is missing: {}", .0.display())]
    ResourceMissing(PathBuf),

    #[error("Unable to decode {}: {source}", .path.display())]
    DecodeError {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("Audio output is unavailable: {0}")]
    DeviceError(eyre::Report),
}
