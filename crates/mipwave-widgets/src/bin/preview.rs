//! mipwave-preview - render a synthesized waveform in the terminal
//!
//! Usage: mipwave-preview [--width N] [--rows N] [--start F] [--length F]
//!                        [--time SECONDS] [--seconds SECONDS] [--color NAME]
//!                        [--worker] [--ansi] [--config PATH] [--save-config]
//!
//! `--start` and `--length` are minimap fractions in [0, 1]. Set
//! RUST_LOG=debug for pyramid and frame timing output.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use mipwave_core::{
    default_config_path, load_config, save_config, RenderConfig, RenderSink, SampleBuffer,
    SurfaceSize, WaveformRenderer,
};
use mipwave_widgets::{color_by_name, render_ascii, TerminalBackend, WaveformView, WorkerBackend};

const CONFIG_FILENAME: &str = "render.yaml";

struct Options {
    width: u32,
    rows: u32,
    start: f64,
    length: f64,
    time: Option<f64>,
    seconds: f64,
    color: Option<String>,
    worker: bool,
    ansi: bool,
    config: Option<PathBuf>,
    save_config: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 100,
            rows: 16,
            start: 0.0,
            length: 0.0,
            time: None,
            seconds: 4.0,
            color: None,
            worker: false,
            ansi: false,
            config: None,
            save_config: false,
        }
    }
}

fn parse_args<I>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{} expects a value", name))
        };
        match arg.as_str() {
            "--width" => opts.width = value("--width")?.parse().context("invalid --width")?,
            "--rows" => opts.rows = value("--rows")?.parse().context("invalid --rows")?,
            "--start" => opts.start = value("--start")?.parse().context("invalid --start")?,
            "--length" => opts.length = value("--length")?.parse().context("invalid --length")?,
            "--time" => opts.time = Some(value("--time")?.parse().context("invalid --time")?),
            "--seconds" => {
                opts.seconds = value("--seconds")?.parse().context("invalid --seconds")?
            }
            "--color" => opts.color = Some(value("--color")?),
            "--config" => opts.config = Some(PathBuf::from(value("--config")?)),
            "--worker" => opts.worker = true,
            "--ansi" => opts.ansi = true,
            "--save-config" => opts.save_config = true,
            other => bail!("unknown argument: {}", other),
        }
    }

    if !(opts.seconds > 0.0) {
        bail!("--seconds must be positive");
    }
    Ok(opts)
}

/// Decaying two-tone test signal with a short burst in the middle
fn synthesize(seconds: f64, sample_rate: f64) -> SampleBuffer {
    let count = (seconds * sample_rate) as usize;
    let burst = count / 2..count / 2 + count / 20;
    (0..count)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let phase = (t * 4.0).fract();
            let envelope = (1.0 - phase).powi(2);
            let tone = (t * 220.0 * std::f64::consts::TAU).sin() * 0.6
                + (t * 3.0 * std::f64::consts::TAU).sin() * 0.3;
            let mut sample = tone * envelope;
            if burst.contains(&i) {
                sample = sample.signum() * 0.95;
            }
            sample as f32
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let opts = parse_args(std::env::args().skip(1))?;
    let config_path = opts
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(CONFIG_FILENAME));
    let mut config: RenderConfig = load_config(&config_path);

    if let Some(name) = &opts.color {
        config.color = color_by_name(name).with_context(|| format!("unknown color: {}", name))?;
    }
    if opts.save_config {
        save_config(&config, &config_path)?;
    }

    let samples = synthesize(opts.seconds, config.sample_rate);
    log::info!(
        "Synthesized {} samples ({:.1}s at {} Hz)",
        samples.len(),
        opts.seconds,
        config.sample_rate
    );

    let view = WaveformView::new(samples, opts.seconds)
        .with_fractions(opts.start, opts.length)
        .current_time(opts.time)
        .sample_rate(config.sample_rate)
        .foreground_color(config.color);
    let surface = SurfaceSize::new(opts.width, opts.rows);

    if opts.worker {
        let mut renderer = WaveformRenderer::with_backend(&config, WorkerBackend::spawn)?;
        renderer.on_resize(surface);
        view.apply(&mut renderer);

        let Some(submission) = renderer.draw()? else {
            log::warn!("Nothing to draw");
            return Ok(());
        };
        let result = renderer
            .backend()
            .recv_timeout(Duration::from_secs(5))
            .context("raster worker did not deliver a frame")?;
        for line in render_ascii(&result.columns, opts.rows as usize) {
            println!("{}", line);
        }
        log::info!(
            "Frame {} drawn from level {} ({} bins)",
            submission.frame,
            submission.level,
            submission.count
        );
    } else {
        let backend = TerminalBackend::new().with_ansi_color(opts.ansi);
        let mut renderer = WaveformRenderer::new(backend, &config);
        renderer.on_resize(surface);
        view.apply(&mut renderer);

        match renderer.draw()? {
            Some(submission) => {
                renderer.backend().write_to(&mut io::stdout().lock())?;
                log::info!(
                    "Frame {} drawn from level {} ({} bins)",
                    submission.frame,
                    submission.level,
                    submission.count
                );
            }
            None => log::warn!("Nothing to draw"),
        }
    }

    Ok(())
}
