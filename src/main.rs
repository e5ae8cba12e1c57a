//! Chirp - pocket polyphonic synthesizer engine

use anyhow::{bail, Result};
use chirp::config::{self, ChirpConfig};
use chirp::control::{Controls, StateMachine};
use chirp::engine::{default_device_name, list_output_devices, Engine, Player, WavSink};
use chirp::synth::Waveform;
use clap::Parser;
use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config,
            mode,
            pitch,
            tone,
        } => play(&config, mode.as_deref(), pitch, tone),

        Commands::Record {
            config,
            output,
            duration,
            mode,
            pitch,
            tone,
        } => record(&config, &output, duration, &mode, pitch, tone),

        Commands::Devices => {
            devices();
            Ok(())
        }

        Commands::Check { config } => check(&config),

        Commands::Init => init(),
    }
}

fn load_or_default(path: &Path) -> Result<ChirpConfig> {
    if path.exists() {
        config::load_config(path)
    } else {
        println!("No config at {:?}, using defaults.", path);
        Ok(ChirpConfig::default())
    }
}

fn play(config_path: &Path, mode: Option<&str>, pitch: u16, tone: u16) -> Result<()> {
    let cfg = load_or_default(config_path)?;

    println!("Starting Chirp...");
    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
    println!("  Buffer: {} frames", cfg.audio.buffer_size);

    let controls = Arc::new(Controls::new());
    controls.set_pitch(pitch);
    controls.set_tone(tone);

    let mut machine =
        StateMachine::new(Duration::from_secs(cfg.controls.menu_timeout_secs));
    if let Some(name) = mode {
        let waveform = match Waveform::from_name(name) {
            Some(wf) => wf,
            None => bail!("unknown waveform mode: {}", name),
        };
        machine.menu_mut().select_waveform(waveform);
        println!("  Mode: {}", waveform.name());
    } else {
        println!("  Mode: none (use 'right'/'left' then 'press' to pick one)");
    }
    machine.publish(&controls);

    let engine = Engine::new(&cfg);
    let mut player = Player::new();
    player.start(engine, controls.clone(), cfg.audio.device.as_deref())?;

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = running.clone();
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::SeqCst);
    })?;

    println!();
    println!("Commands: left | right | press | hold | pitch <0-4095> |");
    println!("          tone <0-4095> | beep [hz] [ms] | status | quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        let mut parts = line.split_whitespace();
        let beep = match parts.next() {
            Some("left") => {
                machine.on_encoder_moved(-1);
                println!("> {}", machine.menu().current_item().name());
                None
            }
            Some("right") => {
                machine.on_encoder_moved(1);
                println!("> {}", machine.menu().current_item().name());
                None
            }
            Some("press") => machine.on_button_short_press(),
            Some("hold") => machine.on_button_long_press(),
            Some("pitch") => {
                if let Some(value) = parts.next().and_then(|v| v.parse().ok()) {
                    controls.set_pitch(value);
                } else {
                    println!("usage: pitch <0-4095>");
                }
                None
            }
            Some("tone") => {
                if let Some(value) = parts.next().and_then(|v| v.parse().ok()) {
                    controls.set_tone(value);
                } else {
                    println!("usage: tone <0-4095>");
                }
                None
            }
            Some("beep") => {
                let hz = parts.next().and_then(|v| v.parse().ok()).unwrap_or(880);
                let ms = parts.next().and_then(|v| v.parse().ok()).unwrap_or(100);
                controls.request_beep(hz, ms);
                None
            }
            Some("status") => {
                let frame = controls.snapshot();
                println!(
                    "state: {:?}  mode: {}  pitch: {}  tone: {}",
                    frame.state,
                    frame
                        .mode
                        .and_then(Waveform::from_mode_index)
                        .map(|w| w.name())
                        .unwrap_or("none"),
                    frame.pitch,
                    frame.tone
                );
                None
            }
            Some("quit") | Some("exit") => break,
            Some(other) => {
                println!("unknown command: {}", other);
                None
            }
            None => None,
        };

        machine.update();
        machine.publish(&controls);
        if let Some(beep) = beep {
            controls.request_beep(beep.frequency_hz, beep.duration_ms);
        }
    }

    println!("Stopping...");
    player.stop();
    Ok(())
}

fn record(
    config_path: &Path,
    output: &Path,
    duration: u64,
    mode: &str,
    pitch: u16,
    tone: u16,
) -> Result<()> {
    let cfg = load_or_default(config_path)?;

    let waveform = match Waveform::from_name(mode) {
        Some(wf) => wf,
        None => bail!("unknown waveform mode: {}", mode),
    };

    println!(
        "Recording {}s of {} at pitch {} to {:?}...",
        duration,
        waveform.name(),
        pitch,
        output
    );

    let mut engine = Engine::new(&cfg);
    let mut sink = WavSink::new(output, cfg.audio.sample_rate)?;

    let frame = chirp::control::ControlFrame {
        state: chirp::control::PlayState::Playing,
        mode: Some(waveform.mode_index()),
        pitch,
        tone,
    };

    let total_frames = cfg.audio.sample_rate as u64 * duration;
    let mut last_progress = 0;
    while sink.frames_written() < total_frames {
        engine.run_cycle(&frame, &mut sink)?;

        let secs = sink.frames_written() / cfg.audio.sample_rate as u64;
        if secs > last_progress {
            last_progress = secs;
            print!("\r  Progress: {}s / {}s", secs, duration);
            use std::io::Write;
            std::io::stdout().flush()?;
        }
    }

    sink.finalize()?;
    println!("\nRecorded to {:?}", output);
    Ok(())
}

fn devices() {
    println!("Available audio output devices:\n");

    if let Some(name) = default_device_name() {
        println!("Default output: {}\n", name);
    }

    let devices = list_output_devices();
    if devices.is_empty() {
        println!("  (none found)");
    }
    for (name, config) in devices {
        println!(
            "  - {} ({} Hz, {} ch)",
            name, config.sample_rate.0, config.channels
        );
    }
}

fn check(config_path: &Path) -> Result<()> {
    println!("Checking configuration at {:?}...", config_path);

    match config::load_config(config_path) {
        Ok(cfg) => {
            println!("Configuration is valid!");
            println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
            println!("  Buffer size: {} frames", cfg.audio.buffer_size);
            println!(
                "  Pitch range: {} - {} Hz (noise ceiling {} Hz)",
                cfg.controls.min_freq, cfg.controls.max_freq, cfg.controls.noise_max_freq
            );
            println!(
                "  Dead zones: {} low / {} high of {}",
                cfg.controls.dead_zone_low,
                cfg.controls.dead_zone_high,
                cfg.controls.control_max
            );
            println!("  Harmonic ratios: {:?}", cfg.master.harmonic_ratios);
            println!("  Output scale: {:.2}", cfg.master.output_scale);
            Ok(())
        }
        Err(e) => {
            println!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
    }
}

fn init() -> Result<()> {
    let example_config = include_str!("../chirp.example.yaml");

    let path = "chirp.yaml";
    if Path::new(path).exists() {
        println!("chirp.yaml already exists. Not overwriting.");
    } else {
        std::fs::write(path, example_config)?;
        println!("Created chirp.yaml with example configuration.");
    }
    Ok(())
}
