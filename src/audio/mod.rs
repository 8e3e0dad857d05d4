pub mod capture;
pub mod decode;
pub mod encoder;
pub mod waveform;

pub use capture::{
    AudioChunk, CaptureBackend, CaptureError, CapturedRecording, RecordingCapture,
    CANONICAL_CONTENT_TYPE, ENCODING_PREFERENCE,
};
pub use encoder::{encode_wav, DecodedAudio};
pub use waveform::{summarize, DEFAULT_BUCKETS};
