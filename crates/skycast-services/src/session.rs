//! Weather session orchestration.
//!
//! Owns the per-session state (current snapshot, daily summaries, display
//! unit, favorites) and runs the fetch-and-display cycle for a queried
//! city. User actions come in as method calls; what goes out is a fully
//! resolved [`DisplayModel`] for the presentation layer to render.
//!
//! Canonical values stay metric in memory; a unit change only re-projects
//! them and never touches the network.

use chrono::{DateTime, Local, Utc};
use skycast_core::{AppError, Config, WeatherError};
use skycast_core::DisplayUnit as ConfigUnit;
use skycast_weather::{
    daily_summaries, units, DailyForecastSummary, DisplayUnit, WeatherProvider, WeatherSample,
};

use crate::error_mapping;
use crate::favorites::FavoritesStore;
use crate::map::MapWidget;
use crate::storage::{FileStorage, StorageBackend};

/// Identifies one issued fetch. A later ticket invalidates all earlier
/// ones; completions carrying a stale ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Result of applying a completed fetch to the session.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The fetch was the latest issued; state was replaced wholesale and
    /// the new display model produced.
    Applied(DisplayModel),
    /// A newer search was issued while this fetch was in flight; state is
    /// untouched.
    Stale,
}

/// Fully resolved, presentation-ready projection of the session state.
///
/// All strings are final display text: converted units, rounded values,
/// labels attached. The rendering layer projects this to UI without any
/// further arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    /// "Name, CC" as returned by the provider
    pub location: String,
    /// Whole degrees with unit suffix, e.g. "59°F"
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    /// e.g. "72%"
    pub humidity: String,
    /// One decimal with unit, e.g. "9.2 mph"
    pub wind_speed: String,
    /// e.g. "1012 hPa"
    pub pressure: String,
    pub icon_url: String,
    /// Whether the displayed location is currently saved as a favorite
    pub is_favorite: bool,
    /// Up to five daily cards, ascending by date
    pub forecast: Vec<ForecastCard>,
    pub details: DetailPanel,
}

/// One card of the daily forecast strip.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    /// Short weekday, e.g. "Mon"
    pub day: String,
    /// Short month and day, e.g. "Aug 7"
    pub date: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
}

/// Extended readings for the details view. Absent readings render "N/A".
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub temp_min: String,
    pub temp_max: String,
    /// e.g. "250°" or "N/A"
    pub wind_direction: String,
    /// e.g. "40%" or "N/A"
    pub cloudiness: String,
    /// Kilometers with one decimal, e.g. "10.0 km", or "N/A"
    pub visibility: String,
    /// Local wall-clock time, e.g. "5:32 AM"
    pub sunrise: String,
    pub sunset: String,
}

/// Favorites-page card projected from a stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteCard {
    pub location: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
}

/// Orchestrates one user session: query, unit preference, favorites, map.
pub struct WeatherSession<S: StorageBackend> {
    provider: WeatherProvider,
    favorites: FavoritesStore<S>,
    map: Box<dyn MapWidget>,
    unit: DisplayUnit,
    marker_zoom: u8,
    current: Option<WeatherSample>,
    forecast: Vec<DailyForecastSummary>,
    latest_ticket: u64,
}

impl WeatherSession<FileStorage> {
    /// Build a session from configuration: provider credential and base
    /// URL, display unit, and file-backed favorites under the config
    /// directory.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be constructed or the storage
    /// directory cannot be created.
    pub fn from_config(config: &Config, map: Box<dyn MapWidget>) -> Result<Self, AppError> {
        let provider = WeatherProvider::with_base_url(
            config.weather.api_key.clone(),
            &config.weather.api_base_url,
        )
        .map_err(error_mapping::weather_error)?;

        let storage = FileStorage::new(config.config_dir.join("storage"))
            .map_err(error_mapping::storage_error)?;
        let favorites = FavoritesStore::load(storage).map_err(error_mapping::storage_error)?;

        let unit = match config.weather.units {
            ConfigUnit::Celsius => DisplayUnit::Celsius,
            ConfigUnit::Fahrenheit => DisplayUnit::Fahrenheit,
        };

        Ok(Self::new(provider, favorites, map, unit, config.map.marker_zoom))
    }
}

impl<S: StorageBackend> WeatherSession<S> {
    pub fn new(
        provider: WeatherProvider,
        favorites: FavoritesStore<S>,
        map: Box<dyn MapWidget>,
        unit: DisplayUnit,
        marker_zoom: u8,
    ) -> Self {
        Self {
            provider,
            favorites,
            map,
            unit,
            marker_zoom,
            current: None,
            forecast: Vec::new(),
            latest_ticket: 0,
        }
    }

    /// Run one fetch-and-display cycle for a queried city name.
    ///
    /// The query is trimmed; an empty query is rejected without any
    /// network traffic. The forecast is requested only after current
    /// conditions succeed, and a failure on either request leaves the
    /// previously displayed data untouched.
    ///
    /// # Errors
    /// Returns the classified fetch failure; `user_message()` on it is
    /// suitable for inline display.
    pub async fn search(&mut self, query: &str) -> Result<SearchOutcome, AppError> {
        let city = query.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyQuery.into());
        }

        let ticket = self.next_ticket();

        let sample = self
            .provider
            .current(city)
            .await
            .map_err(error_mapping::weather_error)?;
        let points = self
            .provider
            .forecast(city)
            .await
            .map_err(error_mapping::weather_error)?;
        let daily = daily_summaries(&points);

        Ok(self.apply_fetch(ticket, sample, daily))
    }

    /// Issue a ticket for a fetch about to start.
    ///
    /// Issuing a ticket invalidates all previously issued ones: the last
    /// *issued* search wins, not the last one to finish.
    pub fn next_ticket(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        FetchTicket(self.latest_ticket)
    }

    /// Apply a completed fetch to the session.
    ///
    /// Replaces the held snapshot and summaries wholesale, refreshes the
    /// favorite-button state, and drives the map (recenter plus a single
    /// replacing marker). A completion whose ticket is no longer the
    /// latest is discarded without touching any state.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        sample: WeatherSample,
        forecast: Vec<DailyForecastSummary>,
    ) -> SearchOutcome {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                "Discarding stale fetch completion (ticket {} < {})",
                ticket.0,
                self.latest_ticket
            );
            return SearchOutcome::Stale;
        }

        tracing::info!("Displaying weather for {}", sample.location_key());

        self.map.resize_if_needed();
        self.map.recenter(sample.coord.lat, sample.coord.lon, self.marker_zoom);
        self.map.place_marker(sample.coord.lat, sample.coord.lon, &sample.name);

        let is_favorite = self.favorites.is_favorite(&sample.location_key());
        let model = project(&sample, &forecast, self.unit, is_favorite);

        self.current = Some(sample);
        self.forecast = forecast;

        SearchOutcome::Applied(model)
    }

    /// Change the display unit and re-project the held snapshot.
    ///
    /// Conversion happens against the canonical metric values already in
    /// memory; no network request is made. Returns `None` when nothing is
    /// displayed yet.
    pub fn set_unit(&mut self, unit: DisplayUnit) -> Option<DisplayModel> {
        self.unit = unit;
        self.display_model()
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    /// Project the current session state, if a snapshot is held.
    pub fn display_model(&self) -> Option<DisplayModel> {
        let sample = self.current.as_ref()?;
        let is_favorite = self.favorites.is_favorite(&sample.location_key());
        Some(project(sample, &self.forecast, self.unit, is_favorite))
    }

    /// Toggle the currently displayed location in the favorites list.
    ///
    /// Returns the new favorite state, or `None` when nothing is
    /// displayed (nothing to toggle).
    ///
    /// # Errors
    /// Fails only if persisting the updated list fails.
    pub fn toggle_favorite(&mut self) -> Result<Option<bool>, AppError> {
        let Some(sample) = self.current.clone() else {
            return Ok(None);
        };

        let now_favorite = self
            .favorites
            .toggle(&sample)
            .map_err(error_mapping::storage_error)?;
        Ok(Some(now_favorite))
    }

    /// Favorites-page cards projected from the stored snapshots in the
    /// current display unit.
    pub fn favorite_cards(&self) -> Vec<FavoriteCard> {
        self.favorites
            .entries()
            .iter()
            .map(|entry| FavoriteCard {
                location: format!("{}, {}", entry.name, entry.country),
                temperature: format_temperature(entry.snapshot.temperature, self.unit),
                description: entry.snapshot.condition.description.clone(),
                icon_url: entry.snapshot.condition.icon_url(),
            })
            .collect()
    }

    /// Delete a favorite by its row position; out-of-range is a no-op.
    ///
    /// # Errors
    /// Fails only if persisting the updated list fails.
    pub fn remove_favorite_at(&mut self, index: usize) -> Result<(), AppError> {
        self.favorites.remove_at(index).map_err(error_mapping::storage_error)
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }
}

fn project(
    sample: &WeatherSample,
    forecast: &[DailyForecastSummary],
    unit: DisplayUnit,
    is_favorite: bool,
) -> DisplayModel {
    DisplayModel {
        location: format!("{}, {}", sample.name, sample.country),
        temperature: format_temperature(sample.temperature, unit),
        description: sample.condition.description.clone(),
        feels_like: format_temperature(sample.feels_like, unit),
        humidity: format!("{}%", sample.humidity),
        wind_speed: format_wind_speed(sample.wind_speed, unit),
        pressure: format!("{} hPa", sample.pressure),
        icon_url: sample.condition.icon_url(),
        is_favorite,
        forecast: forecast.iter().map(|s| forecast_card(s, unit)).collect(),
        details: detail_panel(sample, unit),
    }
}

fn forecast_card(summary: &DailyForecastSummary, unit: DisplayUnit) -> ForecastCard {
    let local = summary.representative.timestamp.with_timezone(&Local);
    ForecastCard {
        day: local.format("%a").to_string(),
        date: local.format("%b %-d").to_string(),
        temperature: format_temperature(summary.representative.temperature, unit),
        description: summary.representative.condition.description.clone(),
        icon_url: summary.representative.condition.icon_url(),
    }
}

fn detail_panel(sample: &WeatherSample, unit: DisplayUnit) -> DetailPanel {
    DetailPanel {
        temp_min: format_temperature(sample.temp_min, unit),
        temp_max: format_temperature(sample.temp_max, unit),
        wind_direction: sample
            .wind_direction
            .map(|d| format!("{}°", d))
            .unwrap_or_else(|| "N/A".to_string()),
        cloudiness: sample
            .cloudiness
            .map(|c| format!("{}%", c))
            .unwrap_or_else(|| "N/A".to_string()),
        visibility: sample
            .visibility
            .map(|v| format!("{:.1} km", f64::from(v) / 1000.0))
            .unwrap_or_else(|| "N/A".to_string()),
        sunrise: format_clock(sample.sunrise),
        sunset: format_clock(sample.sunset),
    }
}

/// Whole degrees with the unit label, e.g. "59°F".
fn format_temperature(celsius: f64, unit: DisplayUnit) -> String {
    let converted = units::display_temperature(celsius, unit).round();
    format!("{}{}", converted, unit.temperature_label())
}

/// One decimal with the unit label, e.g. "9.2 mph".
fn format_wind_speed(meters_per_second: f64, unit: DisplayUnit) -> String {
    let converted = units::display_wind_speed(meters_per_second, unit);
    format!("{:.1} {}", converted, unit.wind_label())
}

/// Local wall-clock time, e.g. "5:32 AM".
fn format_clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-I:%M %p").to_string()
}
