//! Upload screen, desktop edition.
//!
//! ## Usage
//!
//! ```bash
//! # Crop photo.png to 300x400 and send it through both clients
//! upload-desktop --image photo.png
//!
//! # Send the file untouched through the pinned client only, against a
//! # local mock server
//! upload-desktop --image photo.png --no-crop --via pinned \
//!     --endpoint http://127.0.0.1:3000/request
//!
//! # Trust only the given DER certificate on the pinned client
//! upload-desktop --image photo.png --via pinned --enforce-pinning \
//!     --pinned-cert echo.cer --endpoint https://echo.example/request
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use tracing::{info, warn};
use upload_core::{
    pick_image, run_upload, ImagePicker, PinningOptions, ResponseState, Screen, Transport,
    UploadClient, UploadVariant, DEFAULT_ENDPOINT,
};
use upload_desktop::{render, FileSource, PathPicker, PinnedTransport, PlainTransport};

/// Pick an image, send it through a plain and a pinned HTTP client, and
/// check that the echo endpoint saw the file field.
#[derive(Parser)]
#[command(name = "upload-desktop")]
#[command(version)]
struct Cli {
    /// Image to upload. Without it the file dialog opens (when built with
    /// the `dialog` feature).
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Which client to send through
    #[arg(long, value_enum, default_value_t = Via::Both)]
    via: Via,

    /// Echo endpoint
    #[arg(long, env = "UPLOAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// DER certificate trusted by the pinned client (repeatable)
    #[arg(long = "pinned-cert")]
    pinned_certs: Vec<PathBuf>,

    /// Turn certificate checks on for the pinned client
    #[arg(long)]
    enforce_pinning: bool,

    /// Ask the pinned client for public-key pinning
    #[arg(long)]
    pk_pinning: bool,

    /// Send the picked file as-is instead of cropping it to 300x400
    #[arg(long)]
    no_crop: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Via {
    Plain,
    Pinned,
    Both,
}

fn setup_logging(verbosity: u8) {
    // Quiet by default except for the core's "sent data" line.
    let filter = match verbosity {
        0 => "warn,upload_core=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn picker_for(cli: &Cli) -> Result<Box<dyn ImagePicker>> {
    match &cli.image {
        Some(path) => {
            let picker = PathPicker::new(Some(path.clone()));
            Ok(Box::new(if cli.no_crop {
                picker.without_cropping()
            } else {
                picker
            }))
        }
        None => dialog_picker(!cli.no_crop),
    }
}

#[cfg(feature = "dialog")]
fn dialog_picker(crop: bool) -> Result<Box<dyn ImagePicker>> {
    Ok(Box::new(upload_desktop::DialogPicker::new(crop)))
}

#[cfg(not(feature = "dialog"))]
fn dialog_picker(_crop: bool) -> Result<Box<dyn ImagePicker>> {
    anyhow::bail!("no --image given and this build has no file dialog")
}

fn send(screen: &Mutex<Screen>, transport: &dyn Transport, variant: UploadVariant) {
    match run_upload(screen, &FileSource, transport, variant) {
        Ok(Some(state)) => info!(client = variant.label(), ?state, "upload finished"),
        Ok(None) => info!(client = variant.label(), "upload superseded"),
        Err(e) => warn!(client = variant.label(), error = %e, "upload not started"),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let pinning = PinningOptions {
        disable_all_security: !cli.enforce_pinning,
        pk_pinning: cli.pk_pinning,
        certs: cli
            .pinned_certs
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
    };
    let client = UploadClient::new(&cli.endpoint).with_pinning(pinning.clone());
    let screen = Mutex::new(Screen::new(client));

    let picker = picker_for(&cli)?;
    match pick_image(picker.as_ref()).context("image picker failed")? {
        Some(image) => screen.lock().select_image(image),
        None => {
            info!("no image selected");
            print!("{}", render(&screen.lock().view()));
            return Ok(ExitCode::SUCCESS);
        }
    }
    print!("{}", render(&screen.lock().view()));

    let plain = PlainTransport::new();
    let pinned = PinnedTransport::new(&pinning).context("pinned client setup failed")?;

    match cli.via {
        Via::Plain => send(&screen, &plain, UploadVariant::Plain),
        Via::Pinned => send(&screen, &pinned, UploadVariant::Pinned),
        Via::Both => std::thread::scope(|s| {
            s.spawn(|| send(&screen, &plain, UploadVariant::Plain));
            s.spawn(|| send(&screen, &pinned, UploadVariant::Pinned));
        }),
    }

    let screen = screen.lock();
    println!();
    print!("{}", render(&screen.view()));
    Ok(if screen.response() == ResponseState::Succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
