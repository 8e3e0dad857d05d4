// Integration tests for canonical WAV encoding
//
// These tests verify the encoder produces a valid RIFF/WAVE container whose
// header decodes back to the input parameters, and that sample conversion
// clamps instead of wrapping.

use anyhow::Result;
use fluentrack::audio::{encode_wav, DecodedAudio};
use std::io::Cursor;

fn mono(sample_rate: u32, samples: Vec<f32>) -> DecodedAudio {
    DecodedAudio {
        sample_rate,
        channels: vec![samples],
    }
}

fn read_samples(buf: &[u8]) -> Result<(hound::WavSpec, Vec<i16>)> {
    let reader = hound::WavReader::new(Cursor::new(buf))?;
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    Ok((spec, samples))
}

#[test]
fn test_header_roundtrip() -> Result<()> {
    let audio = DecodedAudio {
        sample_rate: 22050,
        channels: vec![vec![0.0; 100], vec![0.0; 100]],
    };

    let buf = encode_wav(&audio)?;
    let (spec, samples) = read_samples(&buf)?;

    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples.len(), 200, "100 frames x 2 channels");
    assert_eq!(buf.len(), 44 + 200 * 2, "44-byte header plus PCM data");

    Ok(())
}

#[test]
fn test_out_of_range_samples_clamp_not_wrap() -> Result<()> {
    let loud = encode_wav(&mono(8000, vec![2.0, -2.0]))?;
    let full_scale = encode_wav(&mono(8000, vec![1.0, -1.0]))?;

    assert_eq!(loud, full_scale, "2.0 must encode identically to 1.0");

    let (_, samples) = read_samples(&loud)?;
    assert_eq!(samples, vec![32767, -32767]);

    Ok(())
}

#[test]
fn test_zero_length_input_yields_header_only() -> Result<()> {
    let buf = encode_wav(&mono(44100, Vec::new()))?;

    assert_eq!(buf.len(), 44, "empty recording is a bare header");

    let (spec, samples) = read_samples(&buf)?;
    assert_eq!(spec.sample_rate, 44100);
    assert!(samples.is_empty());

    Ok(())
}

#[test]
fn test_three_seconds_of_silence_size() -> Result<()> {
    let buf = encode_wav(&mono(44100, vec![0.0; 3 * 44100]))?;

    assert_eq!(buf.len(), 44 + 3 * 44100 * 2);

    Ok(())
}

#[test]
fn test_interleaving_order() -> Result<()> {
    let audio = DecodedAudio {
        sample_rate: 8000,
        channels: vec![vec![0.5, 0.5], vec![-0.5, -0.5]],
    };

    let buf = encode_wav(&audio)?;
    let (_, samples) = read_samples(&buf)?;

    // Channel 0 then channel 1 for each frame.
    assert_eq!(samples, vec![16384, -16384, 16384, -16384]);

    Ok(())
}
