// Integration tests for the waveform amplitude envelope

use fluentrack::audio::{summarize, DEFAULT_BUCKETS};

#[test]
fn test_envelope_has_requested_length() {
    assert_eq!(summarize(&[0.1; 1000], 64).len(), 64);
    assert_eq!(summarize(&[0.1; 10], 64).len(), 64, "shorter than bucket count");
    assert_eq!(summarize(&[0.1; 1000], DEFAULT_BUCKETS).len(), DEFAULT_BUCKETS);
}

#[test]
fn test_empty_input_yields_zero_envelope() {
    let envelope = summarize(&[], 32);

    assert_eq!(envelope.len(), 32);
    assert!(envelope.iter().all(|&v| v == 0.0));
}

#[test]
fn test_buckets_hold_peak_amplitude() {
    let mut samples = vec![0.1f32; 50];
    samples.extend(vec![-0.9f32; 50]);

    let envelope = summarize(&samples, 2);

    assert!((envelope[0] - 0.1).abs() < 1e-6);
    assert!((envelope[1] - 0.9).abs() < 1e-6, "peak is absolute amplitude");
}

#[test]
fn test_envelope_values_are_normalized() {
    let envelope = summarize(&[2.5, -3.0, 0.4], 3);

    assert!(envelope.iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert_eq!(envelope[0], 1.0, "over-range input caps at full scale");
}
