use std::cell::Cell;

use chrono::{DateTime, Utc};

use crate::model::{Location, Theme, Units};
use crate::position::{PositionError, PositionOptions, PositionSource};
use crate::prefs::PreferenceStore;
use crate::providers::WeatherApi;
use crate::view::{self, DashboardModel};

pub const STATUS_FETCHING: &str = "Fetching weather…";
pub const STATUS_READY: &str = "Ready";
pub const STATUS_LOCATING: &str = "Locating…";
pub const STATUS_NOT_FOUND: &str = "City not found. Try another name.";
pub const STATUS_SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const STATUS_FETCH_FAILED: &str =
    "Something went wrong fetching weather. Please try again.";
pub const STATUS_POSITION_FAILED: &str =
    "Location permission denied or unavailable. Try searching a city.";
pub const STATUS_POSITION_UNSUPPORTED: &str =
    "Geolocation is not supported on this device. Try searching a city.";
pub const STATUS_TIP: &str = "Tip: search for a city to begin.";

pub const POSITION_LABEL: &str = "Your location";

pub fn searching_status(place: &str) -> String {
    format!("Searching “{place}”…")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Search,
    Fetch,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Ready,
    Failed(FailureKind),
    /// A newer refresh took over while this one was in flight; nothing was
    /// rendered or persisted on its behalf.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Warn,
    Error,
}

/// Presentation boundary. The engine only produces view models and short
/// status lines; panels, markup and styling live behind this trait.
pub trait DashboardView {
    fn set_status(&self, message: &str, tone: StatusTone);
    fn show_loading(&self);
    fn clear_loading(&self);
    fn render(&self, model: &DashboardModel);
    fn apply_theme(&self, theme: Theme);
}

/// The stateful refresh pipeline: geocode, fetch, render, with status
/// messaging and per-stage error branching.
///
/// States run `Idle → Loading → {Ready, Failed}`; any refresh entry moves to
/// `Loading` unconditionally. Overlapping refreshes are sequenced with a
/// generation counter taken at entry and re-checked after every await: the
/// newest entry owns the panels, an older in-flight refresh that resolves
/// late commits nothing and reports `Superseded`. (The original dashboard
/// let whichever response landed last win the render.)
pub struct RefreshEngine<'a, W, P, S, V, N> {
    api: &'a W,
    position: &'a P,
    prefs: &'a S,
    view: &'a V,
    now_fn: N,
    position_options: PositionOptions,
    state: Cell<EngineState>,
    generation: Cell<u64>,
}

impl<'a, W, P, S, V, N> RefreshEngine<'a, W, P, S, V, N>
where
    W: WeatherApi,
    P: PositionSource,
    S: PreferenceStore,
    V: DashboardView,
    N: Fn() -> DateTime<Utc>,
{
    pub fn new(api: &'a W, position: &'a P, prefs: &'a S, view: &'a V, now_fn: N) -> Self {
        Self {
            api,
            position,
            prefs,
            view,
            now_fn,
            position_options: PositionOptions::default(),
            state: Cell::new(EngineState::Idle),
            generation: Cell::new(0),
        }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.position_options = options;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Startup flow: apply the persisted theme, then refresh from the
    /// remembered place, falling back to device position, falling back to a
    /// search tip.
    pub async fn start(&self) -> RefreshOutcome {
        self.view.apply_theme(self.prefs.theme());

        let last = self.prefs.last_location_label();
        if !last.is_empty() {
            return self.refresh_by_place(&last).await;
        }

        match self.position.current_position(&self.position_options).await {
            Ok(position) => {
                self.refresh_by_coordinates(position.latitude, position.longitude, POSITION_LABEL)
                    .await
            }
            Err(error) => {
                tracing::debug!(%error, "no device position at startup");
                self.view.set_status(STATUS_TIP, StatusTone::Info);
                RefreshOutcome::Failed(FailureKind::Position)
            }
        }
    }

    pub async fn refresh_by_place(&self, place: &str) -> RefreshOutcome {
        let generation = self.begin_refresh();
        self.view
            .set_status(&searching_status(place), StatusTone::Info);
        self.view.show_loading();

        match self.api.geocode(place).await {
            Ok(location) => {
                if !self.is_current(generation) {
                    return RefreshOutcome::Superseded;
                }
                self.prefs.set_last_location_label(&location.label);
                self.fetch_and_render(generation, &location).await
            }
            Err(error) => {
                tracing::warn!(%error, place, "geocoding failed");
                if !self.is_current(generation) {
                    return RefreshOutcome::Superseded;
                }
                self.view.clear_loading();
                self.state.set(EngineState::Failed);
                if error.is_not_found() {
                    self.view.set_status(STATUS_NOT_FOUND, StatusTone::Error);
                    RefreshOutcome::Failed(FailureKind::NotFound)
                } else {
                    self.view.set_status(STATUS_SEARCH_FAILED, StatusTone::Error);
                    RefreshOutcome::Failed(FailureKind::Search)
                }
            }
        }
    }

    pub async fn refresh_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        label: &str,
    ) -> RefreshOutcome {
        let generation = self.begin_refresh();
        let location = Location {
            latitude,
            longitude,
            label: label.to_string(),
        };
        self.fetch_and_render(generation, &location).await
    }

    /// Geolocation entry point: bounded-wait position acquisition, then a
    /// coordinate refresh labelled as the user's own location.
    pub async fn refresh_from_position(&self) -> RefreshOutcome {
        self.view.set_status(STATUS_LOCATING, StatusTone::Info);

        match self.position.current_position(&self.position_options).await {
            Ok(position) => {
                self.refresh_by_coordinates(position.latitude, position.longitude, POSITION_LABEL)
                    .await
            }
            Err(error) => {
                tracing::warn!(%error, "device positioning failed");
                match error {
                    PositionError::Unsupported => self
                        .view
                        .set_status(STATUS_POSITION_UNSUPPORTED, StatusTone::Warn),
                    _ => self
                        .view
                        .set_status(STATUS_POSITION_FAILED, StatusTone::Error),
                }
                RefreshOutcome::Failed(FailureKind::Position)
            }
        }
    }

    /// Persists the unit preference and re-runs the whole pipeline rather
    /// than relabelling already fetched data; with no remembered place a
    /// positioning attempt happens silently.
    pub async fn set_units(&self, units: Units) -> RefreshOutcome {
        self.prefs.set_units(units);

        let last = self.prefs.last_location_label();
        if !last.is_empty() {
            return self.refresh_by_place(&last).await;
        }

        match self.position.current_position(&self.position_options).await {
            Ok(position) => {
                self.refresh_by_coordinates(position.latitude, position.longitude, POSITION_LABEL)
                    .await
            }
            Err(error) => {
                tracing::debug!(%error, "no device position after unit toggle");
                RefreshOutcome::Failed(FailureKind::Position)
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        self.prefs.set_theme(theme);
        self.view.apply_theme(theme);
    }

    fn begin_refresh(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(EngineState::Loading);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    async fn fetch_and_render(&self, generation: u64, location: &Location) -> RefreshOutcome {
        self.view.set_status(STATUS_FETCHING, StatusTone::Info);
        self.view.show_loading();

        match self
            .api
            .forecast(location.latitude, location.longitude)
            .await
        {
            Ok(snapshot) => {
                if !self.is_current(generation) {
                    return RefreshOutcome::Superseded;
                }
                self.view.clear_loading();
                let model = view::build_dashboard(
                    &snapshot,
                    &location.label,
                    self.prefs.units(),
                    (self.now_fn)(),
                );
                self.view.render(&model);
                self.state.set(EngineState::Ready);
                self.view.set_status(STATUS_READY, StatusTone::Info);
                RefreshOutcome::Ready
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    latitude = location.latitude,
                    longitude = location.longitude,
                    "forecast fetch failed"
                );
                if !self.is_current(generation) {
                    return RefreshOutcome::Superseded;
                }
                self.view.clear_loading();
                self.state.set(EngineState::Failed);
                self.view.set_status(STATUS_FETCH_FAILED, StatusTone::Error);
                RefreshOutcome::Failed(FailureKind::Fetch)
            }
        }
    }
}
