use anyhow::{Context, Result};
use std::io::Cursor;

/// Decoded PCM audio, one sample vector per channel.
///
/// All channel vectors are expected to have equal length; the encoder uses the
/// shortest one as the frame count.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels.iter().map(|c| c.len()).min().unwrap_or(0)
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Downmix to a single channel by averaging, for waveform summaries.
    pub fn mono(&self) -> Vec<f32> {
        let frames = self.frame_count();
        if self.channels.len() == 1 {
            return self.channels[0][..frames].to_vec();
        }
        let divisor = self.channels.len() as f32;
        (0..frames)
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f32>() / divisor)
            .collect()
    }
}

/// Encode decoded float samples as a canonical WAV byte buffer: a 44-byte
/// RIFF/WAVE header followed by interleaved 16-bit little-endian PCM.
///
/// Each sample is clamped to [-1.0, 1.0] before scaling to i16 so out-of-range
/// input cannot wrap around. Zero-length input produces a header-only buffer.
pub fn encode_wav(audio: &DecodedAudio) -> Result<Vec<u8>> {
    let channels = audio.channel_count().max(1);
    let frames = audio.frame_count();

    let spec = hound::WavSpec {
        channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buf = Vec::with_capacity(44 + frames * channels as usize * 2);
    {
        let cursor = Cursor::new(&mut buf);
        let mut writer =
            hound::WavWriter::new(cursor, spec).context("Failed to start WAV buffer")?;

        // Interleave: for each frame, channel 0..N-1 in order.
        for i in 0..frames {
            for channel in &audio.channels {
                writer
                    .write_sample(sample_to_i16(channel[i]))
                    .context("Failed to write sample to WAV buffer")?;
            }
        }

        writer.finalize().context("Failed to finalize WAV buffer")?;
    }

    Ok(buf)
}

fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}
