//! CLI interface for Chirp

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pocket polyphonic synthesizer engine
#[derive(Parser)]
#[command(name = "chirp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play in real time, driven by interactive commands on stdin
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "chirp.yaml")]
        config: PathBuf,

        /// Waveform mode to start in (sine, triangle, square, saw, noise)
        #[arg(short, long)]
        mode: Option<String>,

        /// Initial pitch knob value (0-4095)
        #[arg(short, long, default_value = "2048")]
        pitch: u16,

        /// Initial tone knob value (0-4095)
        #[arg(short, long, default_value = "2048")]
        tone: u16,
    },

    /// Render to a WAV file
    Record {
        /// Configuration file path
        #[arg(short, long, default_value = "chirp.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,

        /// Waveform mode (sine, triangle, square, saw, noise)
        #[arg(short, long, default_value = "sine")]
        mode: String,

        /// Pitch knob value (0-4095)
        #[arg(short, long, default_value = "2048")]
        pitch: u16,

        /// Tone knob value (0-4095)
        #[arg(short, long, default_value = "2048")]
        tone: u16,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "chirp.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
