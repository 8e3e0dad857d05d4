pub mod analysis;
pub mod audio;
pub mod classifier;
pub mod config;
pub mod http;
pub mod session;
pub mod store;

pub use analysis::{
    category_trend, classify_label, normalize, trend_points, AnalysisRecord, CategoryPercentages,
    CategoryTrend, PatternCategory, RawAnalysis, RawSegment, TrendDirection, TrendPoint,
};
pub use audio::{
    encode_wav, summarize, AudioChunk, CaptureBackend, CaptureError, CapturedRecording,
    DecodedAudio, RecordingCapture,
};
pub use classifier::{ClassifierService, ClassifyError, ClassifyRequest, HttpClassifier};
pub use config::Config;
pub use http::{create_router, AppState};
pub use session::{
    DashboardEntry, LifecycleConfig, LifecycleError, SessionLifecycle, SessionRecord,
    SessionStatus, TrendReport,
};
pub use store::{BlobStore, FsBlobStore, MemorySessionStore, SessionPatch, SessionStore};
