use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use argh::FromArgs;
use skyglance_core::{AppError, Config};
use skyglance_dashboard::{Dashboard, TerminalPresenter, ViewState};
use skyglance_weather::location::parse_position;
use skyglance_weather::{FileStorage, FixedPosition, NoPosition};

/// Current weather and a 7-day forecast for a place or position.
#[derive(FromArgs)]
struct Args {
    /// place name to look up; omit to use --lat/--lon or the configured position
    #[argh(positional)]
    place: Option<String>,

    /// latitude for a position lookup
    #[argh(option)]
    lat: Option<String>,

    /// longitude for a position lookup
    #[argh(option)]
    lon: Option<String>,

    /// path to the configuration file
    #[argh(option)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    skyglance_core::init()?;
    let args: Args = argh::from_env();

    let (config, _) = match Config::load_validated(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            eprintln!("{}", AppError::from(e).user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    let cache_dir = config.cache.effective_dir();
    let storage = FileStorage::new(&cache_dir)
        .with_context(|| format!("Failed to open cache directory {}", cache_dir.display()))?;
    tracing::debug!("Caching snapshots in {}", storage.dir().display());

    let presenter = TerminalPresenter::new(std::io::stdout());
    let dashboard = Dashboard::from_config(&config, Arc::new(storage), presenter)?;

    let state = match (&args.place, &args.lat, &args.lon) {
        (Some(place), _, _) => dashboard.submit(place).await,
        (None, Some(lat), Some(lon)) => {
            let position = parse_position(lat, lon)?;
            dashboard
                .start(&FixedPosition::new(position.latitude, position.longitude))
                .await
        }
        (None, None, None) => match config.location.position() {
            Some((lat, lon)) => dashboard.start(&FixedPosition::new(lat, lon)).await,
            None => dashboard.start(&NoPosition).await,
        },
        _ => anyhow::bail!("--lat and --lon must be given together"),
    };

    Ok(match state {
        ViewState::Displaying(_) => ExitCode::SUCCESS,
        ViewState::Idle => {
            eprintln!("Nothing to look up: pass a place name or --lat/--lon");
            ExitCode::from(2)
        }
        ViewState::Loading | ViewState::Error(_) => ExitCode::FAILURE,
    })
}
