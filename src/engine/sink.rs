//! Output sink abstraction
//!
//! The engine hands each filled buffer to a sink via a blocking call;
//! the sink returning is the only thing that paces the audio loop.

use thiserror::Error;

/// Errors at the output transport seam.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The consuming side of the transport has gone away.
    #[error("output transport disconnected")]
    Disconnected,

    /// A WAV write failed.
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),
}

/// A blocking consumer of interleaved stereo i16 buffers.
pub trait OutputSink {
    /// Hand off one filled buffer. Blocks until the transport has
    /// accepted it.
    fn write(&mut self, buffer: &[i16]) -> Result<(), SinkError>;
}

/// Sink that captures everything written, for tests and inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffers: Vec<Vec<i16>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffers(&self) -> &[Vec<i16>] {
        &self.buffers
    }

    /// All captured samples, concatenated.
    pub fn samples(&self) -> Vec<i16> {
        self.buffers.iter().flatten().copied().collect()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, buffer: &[i16]) -> Result<(), SinkError> {
        self.buffers.push(buffer.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_writes() {
        let mut sink = MemorySink::new();
        sink.write(&[1, 2, 3, 4]).unwrap();
        sink.write(&[5, 6]).unwrap();

        assert_eq!(sink.buffers().len(), 2);
        assert_eq!(sink.samples(), vec![1, 2, 3, 4, 5, 6]);
    }
}
