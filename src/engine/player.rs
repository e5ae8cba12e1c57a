//! Real-time audio playback using cpal
//!
//! The engine runs on its own thread and pushes filled buffers into a
//! small bounded channel; the cpal callback drains it. A full channel
//! blocks the engine's `send`, which is the hardware back-pressure
//! that paces the whole audio loop. The engine thread never blocks on
//! anything else.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, SampleRate, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use super::{Engine, OutputSink, SinkError};
use crate::control::Controls;

/// How many filled buffers may queue ahead of the device.
const QUEUE_DEPTH: usize = 2;

/// Blocking sink backed by the bounded channel to the audio callback.
struct ChannelSink {
    tx: SyncSender<Vec<i16>>,
}

impl OutputSink for ChannelSink {
    fn write(&mut self, buffer: &[i16]) -> Result<(), SinkError> {
        // Blocks while the queue is full; returns Err once the stream
        // side has been dropped.
        self.tx
            .send(buffer.to_vec())
            .map_err(|_| SinkError::Disconnected)
    }
}

/// Real-time audio player
pub struct Player {
    stream: Option<Stream>,
    engine_thread: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            stream: None,
            engine_thread: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the engine thread and the output stream.
    ///
    /// The engine is moved onto a dedicated thread that does nothing
    /// but run audio cycles; `controls` is its only tie to the rest of
    /// the program.
    pub fn start(
        &mut self,
        engine: Engine,
        controls: Arc<Controls>,
        device_name: Option<&str>,
    ) -> Result<()> {
        let device = find_output_device(device_name)?;
        let sample_format = device.default_output_config()?.sample_format();
        let stream_config = StreamConfig {
            channels: 2,
            sample_rate: SampleRate(engine.sample_rate() as u32),
            buffer_size: BufferSize::Default,
        };

        let (tx, rx) = mpsc::sync_channel::<Vec<i16>>(QUEUE_DEPTH);

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, rx)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, rx)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, rx)?,
            _ => return Err(anyhow!("Unsupported sample format")),
        };
        stream.play()?;

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let handle = std::thread::Builder::new()
            .name("chirp-audio".to_string())
            .spawn(move || {
                let mut engine = engine;
                let mut sink = ChannelSink { tx };

                while running.load(Ordering::SeqCst) {
                    if let Some((frequency, duration_ms)) = controls.take_beep() {
                        engine.play_feedback_tone(frequency, duration_ms);
                    }
                    let frame = controls.snapshot();
                    if engine.run_cycle(&frame, &mut sink).is_err() {
                        // Stream side went away; nothing left to pace us.
                        break;
                    }
                }
            })?;

        self.stream = Some(stream);
        self.engine_thread = Some(handle);
        Ok(())
    }

    /// Stop playback and join the engine thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        // Dropping the stream drops the receiver, which unblocks an
        // engine thread stuck in `send`.
        self.stream = None;
        if let Some(handle) = self.engine_thread.take() {
            let _ = handle.join();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

fn find_output_device(name: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();
    match name {
        None => host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available")),
        Some(wanted) => {
            let mut devices = host.output_devices()?;
            devices
                .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
                .ok_or_else(|| anyhow!("Output device not found: {}", wanted))
        }
    }
}

fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<i16>>(
    device: &Device,
    config: &StreamConfig,
    rx: Receiver<Vec<i16>>,
) -> Result<Stream> {
    let channels = config.channels as usize;

    // Carry a partially-consumed buffer across callbacks; the device
    // period and the engine buffer size need not match.
    let mut pending: Vec<i16> = Vec::new();
    let mut position = 0usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                if position >= pending.len() {
                    match rx.try_recv() {
                        Ok(next) => {
                            pending = next;
                            position = 0;
                        }
                        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                            // Underrun or shutdown: emit silence.
                            for sample in frame.iter_mut() {
                                *sample = T::from_sample(0i16);
                            }
                            continue;
                        }
                    }
                }

                // Engine frames are interleaved stereo with identical
                // channels; replicate the left sample across whatever
                // the device has.
                let value = pending[position];
                position += 2;
                for sample in frame.iter_mut() {
                    *sample = T::from_sample(value);
                }
            }
        },
        |err| {
            eprintln!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List all available output devices with their default configs
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
