//! WAV file output sink
//!
//! Offline rendering target: the same interleaved stereo buffers the
//! real-time path emits, written to a 16-bit WAV file via hound.

use super::{OutputSink, SinkError};
use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// WAV file sink
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    frames_written: u64,
}

impl WavSink {
    /// Create a stereo 16-bit WAV sink.
    pub fn new(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            frames_written: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stereo frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Duration recorded in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Finalize the WAV file.
    ///
    /// Must be called to close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

impl OutputSink for WavSink {
    fn write(&mut self, buffer: &[i16]) -> Result<(), SinkError> {
        for &sample in buffer {
            self.writer.write_sample(sample)?;
        }
        self.frames_written += buffer.len() as u64 / 2;
        Ok(())
    }
}
