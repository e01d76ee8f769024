//! Drives a lookup from user input (or a position fix) to the presenter.
//!
//! Every cycle takes a ticket from [`RequestGeneration`]; only the newest
//! ticket may change what is on screen. A slow lookup that finishes after a
//! newer one started is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Locale;
use parking_lot::Mutex;
use skyglance_core::{AppError, Config, LookupError};
use skyglance_weather::{
    build_client, CacheKey, CacheStorage, LocationResolver, Position, PositionSource,
    SystemClock, WeatherCache, WeatherError, WeatherProvider,
};

use crate::error_mapping::WeatherErrorExt;
use crate::presenter::Presenter;
use crate::view::{DashboardView, IconSet};

pub const DEFAULT_LOCATION_LABEL: &str = "Your current location";

/// What the dashboard is currently showing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Displaying(DashboardView),
    Error(String),
}

/// Which panels are visible for a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub spinner: bool,
    pub main: bool,
    pub error: bool,
}

impl ViewState {
    pub fn panels(&self) -> Panels {
        match self {
            ViewState::Idle => Panels {
                spinner: false,
                main: false,
                error: false,
            },
            ViewState::Loading => Panels {
                spinner: true,
                main: false,
                error: false,
            },
            ViewState::Displaying(_) => Panels {
                spinner: false,
                main: true,
                error: false,
            },
            ViewState::Error(_) => Panels {
                spinner: false,
                main: false,
                error: true,
            },
        }
    }
}

/// Identifies one request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonically increasing request counter
#[derive(Debug, Default)]
pub struct RequestGeneration(AtomicU64);

impl RequestGeneration {
    /// Start a new cycle; every earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}

/// Display settings that are not part of the lookup itself
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub icons: IconSet,
    pub location_label: String,
    /// Names used for weekday and date labels
    pub locale: Locale,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            icons: IconSet::default(),
            location_label: DEFAULT_LOCATION_LABEL.to_string(),
            locale: Locale::ar_EG,
        }
    }
}

struct Inner<P> {
    resolver: LocationResolver,
    provider: WeatherProvider,
    settings: DashboardSettings,
    // Lock order: state, then presenter
    state: Mutex<ViewState>,
    presenter: Mutex<P>,
    generation: RequestGeneration,
}

/// The event orchestrator. Cheap to clone; clones share state.
pub struct Dashboard<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for Dashboard<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Presenter> Dashboard<P> {
    pub fn new(
        resolver: LocationResolver,
        provider: WeatherProvider,
        presenter: P,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                resolver,
                provider,
                settings,
                state: Mutex::new(ViewState::Idle),
                presenter: Mutex::new(presenter),
                generation: RequestGeneration::default(),
            }),
        }
    }

    /// Wire up resolver, provider and cache from configuration.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        presenter: P,
    ) -> Result<Self, WeatherError> {
        let weather = &config.weather;
        let client = build_client(weather.request_timeout())?;

        let resolver =
            LocationResolver::with_endpoint(client.clone(), &weather.geocoding_url, &weather.language);
        let cache = WeatherCache::with_clock(storage, Arc::new(SystemClock), weather.cache_ttl());
        let provider = WeatherProvider::with_endpoint(client, &weather.forecast_url, cache);

        let locale = weather.locale().unwrap_or_else(|| {
            tracing::warn!("Unknown date locale {:?}; using ar_EG", weather.date_locale);
            Locale::ar_EG
        });
        let settings = DashboardSettings {
            icons: IconSet::new(&weather.icon_base_url),
            location_label: config.location.label.clone(),
            locale,
        };

        Ok(Self::new(resolver, provider, presenter, settings))
    }

    pub fn state(&self) -> ViewState {
        self.inner.state.lock().clone()
    }

    /// Inspect the presenter.
    pub fn with_presenter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.inner.presenter.lock())
    }

    /// Look up a place name typed by the user.
    pub async fn submit(&self, query: &str) -> ViewState {
        let ticket = self.inner.generation.begin();
        tracing::info!("Looking up weather for {:?}", query);
        self.enter_loading(ticket);

        let outcome = self.lookup_place(query).await.map_err(|e| {
            tracing::warn!("Lookup for {:?} failed: {}", query, e);
            e.into_app_error().user_message().to_string()
        });

        self.finish(ticket, outcome)
    }

    /// Startup lookup from the position source. Does nothing when the
    /// source is unavailable.
    pub async fn start<S: PositionSource>(&self, source: &S) -> ViewState {
        if !source.is_available() {
            tracing::debug!("No position capability; waiting for input");
            return self.state();
        }

        let ticket = self.inner.generation.begin();

        let outcome = match source.current_position().await {
            Ok(position) => {
                self.enter_loading(ticket);
                self.lookup_position(position).await
            }
            Err(e) => Err(WeatherError::Location(e)),
        };

        // Position failures all collapse to one message; keep the detail in logs
        let outcome = outcome.map_err(|e| {
            tracing::debug!("Position lookup failed: {}", e);
            AppError::Lookup(LookupError::PositionUnavailable(e.to_string()))
                .user_message()
                .to_string()
        });

        self.finish(ticket, outcome)
    }

    async fn lookup_place(&self, query: &str) -> Result<DashboardView, WeatherError> {
        let coords = self.inner.resolver.resolve(query).await?;
        let snapshot = self
            .inner
            .provider
            .fetch(coords.latitude, coords.longitude, &CacheKey::place(query))
            .await?;
        Ok(self.view_for(&snapshot, &coords.display_name))
    }

    async fn lookup_position(&self, position: Position) -> Result<DashboardView, WeatherError> {
        let snapshot = self
            .inner
            .provider
            .fetch(position.latitude, position.longitude, &CacheKey::Geolocation)
            .await?;
        Ok(self.view_for(&snapshot, &self.inner.settings.location_label))
    }

    fn view_for(&self, snapshot: &skyglance_weather::WeatherSnapshot, place: &str) -> DashboardView {
        let today = chrono::Local::now().date_naive();
        let settings = &self.inner.settings;
        DashboardView::build(snapshot, place, today, &settings.icons, settings.locale)
    }

    fn enter_loading(&self, ticket: Ticket) {
        let mut state = self.inner.state.lock();
        if !self.inner.generation.is_current(ticket) {
            return;
        }
        self.inner.presenter.lock().show_loading();
        *state = ViewState::Loading;
    }

    fn finish(&self, ticket: Ticket, outcome: Result<DashboardView, String>) -> ViewState {
        let mut state = self.inner.state.lock();
        if !self.inner.generation.is_current(ticket) {
            tracing::debug!("Dropping result of superseded request {:?}", ticket);
            return state.clone();
        }

        let mut presenter = self.inner.presenter.lock();
        *state = match outcome {
            Ok(view) => {
                presenter.render(&view);
                ViewState::Displaying(view)
            }
            Err(message) => {
                presenter.show_error(&message);
                ViewState::Error(message)
            }
        };
        state.clone()
    }
}
