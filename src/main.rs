use anyhow::Context;
use clap::Parser;
use face_keybinder::input::{SystemDisplay, SystemInput};
use face_keybinder::settings::Settings;
use face_keybinder::shapes::parse_sample_line;
use face_keybinder::{logging, Keybinder};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Replay gesture sample vectors through the keybinder, one line per tick.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "settings.json")]
    settings: String,
    /// File of sample vectors in blendshape order. Reads stdin when omitted.
    samples: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.settings)
        .with_context(|| format!("load settings from {}", args.settings))?;
    logging::init(settings.debug_logging, settings.log_file.clone().map(PathBuf::from));

    let tick_interval = Duration::from_millis(settings.tick_interval_ms);
    let shared = settings.into_shared();
    let mut keybinder = Keybinder::new(
        Arc::clone(&shared),
        Arc::new(SystemInput),
        Arc::new(SystemDisplay),
    );
    keybinder.start();

    let reader: Box<dyn BufRead> = match &args.samples {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("read sample line")?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let values = match parse_sample_line(&line) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(line = line_no + 1, %err, "skipping malformed sample");
                continue;
            }
        };
        if let Err(err) = keybinder.evaluate(&values) {
            tracing::error!(line = line_no + 1, %err, "tick aborted");
        }
        if !tick_interval.is_zero() {
            std::thread::sleep(tick_interval);
        }
    }

    keybinder.shutdown();
    Ok(())
}
