use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{decode, encoder};

/// Capture encodings we know how to normalize, most preferred first.
pub const ENCODING_PREFERENCE: &[&str] = &[
    "audio/webm;codecs=opus",
    "audio/webm",
    "audio/ogg;codecs=opus",
    "audio/mp4",
    "audio/wav",
];

/// The canonical content type produced by WAV normalization.
pub const CANONICAL_CONTENT_TYPE: &str = "audio/wav";

/// One chunk of encoded audio delivered by a capture backend.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub bytes: Vec<u8>,
}

/// Live capture backend (microphone device, test fake, ...).
///
/// Injected into `RecordingCapture` so the capture pipeline can be exercised
/// without real hardware. The backend exclusively owns the underlying device
/// between `start` and `stop`; `stop` must release it fully so a later
/// recording can re-acquire it.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Encodings this backend can produce, as content types.
    fn supported_encodings(&self) -> Vec<String>;

    /// Start capturing in the given encoding.
    ///
    /// Returns a channel receiver that will receive encoded chunks until the
    /// backend is stopped, at which point the channel closes.
    async fn start(&mut self, encoding: &str) -> Result<mpsc::Receiver<AudioChunk>>;

    /// Stop capturing and release the device.
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Errors fatal to a capture attempt. No partial recording survives these.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("backend '{backend}' supports none of the preferred encodings (offers: {available:?})")]
    NoSupportedEncoding {
        backend: String,
        available: Vec<String>,
    },

    #[error("failed to start capture: {0}")]
    Start(String),

    #[error("capture is already running")]
    AlreadyCapturing,

    #[error("capture is not running")]
    NotCapturing,
}

/// A finished recording, ready for upload.
#[derive(Debug, Clone)]
pub struct CapturedRecording {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Duration derived from the decoded samples; absent when the recording
    /// fell back to its original captured encoding.
    pub duration_secs: Option<f64>,
    /// Whether the bytes are canonical 16-bit PCM WAV.
    pub canonical: bool,
}

/// Wraps a live capture backend: selects an encoding, buffers chunks as they
/// arrive, and on stop normalizes the assembled recording to canonical WAV.
///
/// Normalization is best effort. If the captured bytes cannot be decoded the
/// recording is preserved in its original encoding rather than discarded.
pub struct RecordingCapture {
    backend: Box<dyn CaptureBackend>,
    encoding: Option<String>,
    buffer: Arc<Mutex<Vec<u8>>>,
    drain_task: Option<JoinHandle<()>>,
}

impl RecordingCapture {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            encoding: None,
            buffer: Arc::new(Mutex::new(Vec::new())),
            drain_task: None,
        }
    }

    /// The encoding selected for the active recording.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Start recording, picking the first preferred encoding the backend
    /// supports.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.backend.is_capturing() {
            return Err(CaptureError::AlreadyCapturing);
        }

        let available = self.backend.supported_encodings();
        let encoding = ENCODING_PREFERENCE
            .iter()
            .find(|preferred| available.iter().any(|a| a.as_str() == **preferred))
            .map(|s| s.to_string())
            .ok_or_else(|| CaptureError::NoSupportedEncoding {
                backend: self.backend.name().to_string(),
                available: available.clone(),
            })?;

        info!(encoding = %encoding, backend = %self.backend.name(), "Starting capture");

        let mut rx = self
            .backend
            .start(&encoding)
            .await
            .map_err(|e| CaptureError::Start(e.to_string()))?;

        // Fresh buffer per recording; the upload guard downstream is reset the
        // same way, once per new recording.
        self.buffer = Arc::new(Mutex::new(Vec::new()));
        self.encoding = Some(encoding);

        let buffer = Arc::clone(&self.buffer);
        self.drain_task = Some(tokio::spawn(async move {
            while let Some(chunk) = rx.recv().await {
                let mut buf = buffer.lock().await;
                buf.extend_from_slice(&chunk.bytes);
            }
        }));

        Ok(())
    }

    /// Stop recording and return the assembled audio, normalized to canonical
    /// WAV when the captured encoding can be decoded.
    ///
    /// Stopping mid-capture is always safe and finalizes whatever was
    /// captured. The backend is released before normalization is attempted, so
    /// the device is free again even if decoding fails.
    pub async fn stop(&mut self) -> Result<CapturedRecording, CaptureError> {
        let encoding = self.encoding.take().ok_or(CaptureError::NotCapturing)?;

        if let Err(e) = self.backend.stop().await {
            warn!(error = %e, "Capture backend reported an error on stop");
        }

        // The backend closed its channel; wait for the drain task to flush the
        // remaining chunks into the buffer.
        if let Some(task) = self.drain_task.take() {
            let _ = task.await;
        }

        let captured = {
            let mut buf = self.buffer.lock().await;
            std::mem::take(&mut *buf)
        };

        info!(
            bytes = captured.len(),
            encoding = %encoding,
            "Capture stopped"
        );

        Ok(normalize_recording(captured, encoding))
    }
}

/// Decode the captured bytes and re-encode them as canonical WAV, keeping the
/// original encoding as a fallback when decoding fails.
fn normalize_recording(bytes: Vec<u8>, encoding: String) -> CapturedRecording {
    let decoded = match decode::decode(&bytes) {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, encoding = %encoding, "Keeping original encoding, decode failed");
            return CapturedRecording {
                bytes,
                content_type: encoding,
                duration_secs: None,
                canonical: false,
            };
        }
    };

    match encoder::encode_wav(&decoded) {
        Ok(wav) => CapturedRecording {
            bytes: wav,
            content_type: CANONICAL_CONTENT_TYPE.to_string(),
            duration_secs: Some(decoded.duration_secs()),
            canonical: true,
        },
        Err(e) => {
            warn!(error = %e, "Keeping original encoding, WAV encode failed");
            CapturedRecording {
                bytes,
                content_type: encoding,
                duration_secs: Some(decoded.duration_secs()),
                canonical: false,
            }
        }
    }
}
