/// Default envelope resolution used for dashboard charts.
pub const DEFAULT_BUCKETS: usize = 64;

/// Reduce a mono sample stream to a fixed-length amplitude envelope.
///
/// Each bucket holds the peak absolute amplitude of its slice of the
/// recording, normalized to [0.0, 1.0]. The output always has exactly
/// `buckets` entries; slices with no samples (shorter recordings) are 0.
pub fn summarize(samples: &[f32], buckets: usize) -> Vec<f32> {
    if buckets == 0 {
        return Vec::new();
    }
    if samples.is_empty() {
        return vec![0.0; buckets];
    }

    let mut envelope = Vec::with_capacity(buckets);
    for i in 0..buckets {
        let start = i * samples.len() / buckets;
        let end = (i + 1) * samples.len() / buckets;

        let peak = samples[start..end]
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()));

        envelope.push(peak.min(1.0));
    }

    envelope
}
