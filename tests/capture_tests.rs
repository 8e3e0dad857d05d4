// Integration tests for recording capture
//
// A fake backend stands in for the microphone so encoding selection,
// chunk buffering, WAV normalization, and the raw-bytes fallback can be
// exercised without hardware.

use anyhow::Result;
use fluentrack::audio::{
    encode_wav, AudioChunk, CaptureBackend, CaptureError, DecodedAudio, RecordingCapture,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

struct FakeBackend {
    encodings: Vec<String>,
    chunks: Vec<Vec<u8>>,
    tx: Option<mpsc::Sender<AudioChunk>>,
    capturing: Arc<AtomicBool>,
    stops: Arc<AtomicUsize>,
}

impl FakeBackend {
    fn new(encodings: &[&str], chunks: Vec<Vec<u8>>) -> Self {
        Self {
            encodings: encodings.iter().map(|s| s.to_string()).collect(),
            chunks,
            tx: None,
            capturing: Arc::new(AtomicBool::new(false)),
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for FakeBackend {
    fn supported_encodings(&self) -> Vec<String> {
        self.encodings.clone()
    }

    async fn start(&mut self, _encoding: &str) -> Result<mpsc::Receiver<AudioChunk>> {
        let (tx, rx) = mpsc::channel(self.chunks.len().max(1));
        for bytes in &self.chunks {
            tx.send(AudioChunk {
                bytes: bytes.clone(),
            })
            .await?;
        }
        // Keep the sender so the stream stays open until stop().
        self.tx = Some(tx);
        self.capturing.store(true, Ordering::SeqCst);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.tx = None;
        self.capturing.store(false, Ordering::SeqCst);
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn wav_fixture(seconds: usize, sample_rate: u32) -> Vec<u8> {
    encode_wav(&DecodedAudio {
        sample_rate,
        channels: vec![vec![0.0; seconds * sample_rate as usize]],
    })
    .expect("fixture encodes")
}

fn split_in_two(bytes: Vec<u8>) -> Vec<Vec<u8>> {
    let mid = bytes.len() / 2;
    vec![bytes[..mid].to_vec(), bytes[mid..].to_vec()]
}

#[tokio::test]
async fn test_capture_produces_canonical_wav() -> Result<()> {
    let wav = wav_fixture(1, 8000);
    let backend = FakeBackend::new(&["audio/wav"], split_in_two(wav.clone()));

    let mut capture = RecordingCapture::new(Box::new(backend));
    capture.start().await?;
    let recording = capture.stop().await?;

    assert!(recording.canonical);
    assert_eq!(recording.content_type, "audio/wav");
    assert_eq!(recording.bytes, wav, "already-canonical audio is bit-stable");
    let duration = recording.duration_secs.expect("decodable audio has duration");
    assert!((duration - 1.0).abs() < 1e-6);

    Ok(())
}

#[tokio::test]
async fn test_undecodable_capture_falls_back_to_original_bytes() -> Result<()> {
    let garbage = vec![vec![1u8, 2, 3, 4], vec![5u8, 6, 7, 8]];
    let backend = FakeBackend::new(&["audio/webm"], garbage);

    let mut capture = RecordingCapture::new(Box::new(backend));
    capture.start().await?;
    let recording = capture.stop().await?;

    assert!(!recording.canonical, "fallback keeps the captured encoding");
    assert_eq!(recording.content_type, "audio/webm");
    assert_eq!(recording.bytes, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(recording.duration_secs.is_none());

    Ok(())
}

#[tokio::test]
async fn test_encoding_selection_follows_preference_order() -> Result<()> {
    let backend = FakeBackend::new(&["audio/wav", "audio/webm"], vec![]);

    let mut capture = RecordingCapture::new(Box::new(backend));
    capture.start().await?;

    // audio/webm outranks audio/wav in the preference list.
    assert_eq!(capture.encoding(), Some("audio/webm"));

    capture.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_unsupported_backend_is_rejected() {
    let backend = FakeBackend::new(&["audio/flac"], vec![]);

    let mut capture = RecordingCapture::new(Box::new(backend));
    let err = capture.start().await.expect_err("no usable encoding");

    assert!(matches!(err, CaptureError::NoSupportedEncoding { .. }));
}

#[tokio::test]
async fn test_stop_releases_backend_for_reuse() -> Result<()> {
    let backend = FakeBackend::new(&["audio/wav"], vec![]);
    let capturing = Arc::clone(&backend.capturing);
    let stops = Arc::clone(&backend.stops);

    let mut capture = RecordingCapture::new(Box::new(backend));

    capture.start().await?;
    assert!(capturing.load(Ordering::SeqCst));

    let err = capture.start().await.expect_err("second start must fail");
    assert!(matches!(err, CaptureError::AlreadyCapturing));

    capture.stop().await?;
    assert!(!capturing.load(Ordering::SeqCst), "device released on stop");
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    // A fresh recording can re-acquire the device.
    capture.start().await?;
    let recording = capture.stop().await?;
    assert_eq!(stops.load(Ordering::SeqCst), 2);
    assert!(recording.bytes.is_empty(), "nothing was captured this time");
    assert!(!recording.canonical);

    Ok(())
}

#[tokio::test]
async fn test_stop_without_start_is_rejected() {
    let backend = FakeBackend::new(&["audio/wav"], vec![]);
    let mut capture = RecordingCapture::new(Box::new(backend));

    let err = capture.stop().await.expect_err("nothing to stop");
    assert!(matches!(err, CaptureError::NotCapturing));
}
