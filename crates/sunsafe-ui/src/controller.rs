//! Single owner of application state.
//!
//! The controller feeds [`Event`]s into [`AppState::update`], executes the
//! resulting [`Effect`]s against storage and the fetch service, and drains
//! fetch results from the service channel.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};
use sunsafe_uv::settings::SETTINGS_KEY;
use sunsafe_uv::{
    DisplayWindow, KeyValueStore, PlaceTable, Settings, SettingsStore, UvCache, UvSample,
};

use crate::app_services::{AppServices, UvServiceMessage};
use crate::dial;
use crate::error_mapping::storage_write_error;
use crate::render;
use crate::services::request_uv_fetch;
use crate::state::{AppState, Effect, Event, Tab};

/// Decimal places kept when a place lookup fills in coordinates
const PLACE_PRECISION: usize = 4;

/// Names offered when a place is not in the table
const PLACE_SUGGESTIONS: usize = 3;

pub struct Controller<Tz: TimeZone> {
    state: AppState,
    settings_store: SettingsStore,
    cache: UvCache,
    services: Arc<AppServices>,
    places: Option<PlaceTable>,
    tz: Tz,
    clock: fn() -> DateTime<Utc>,
}

impl<Tz> Controller<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn new(services: Arc<AppServices>, store: Arc<dyn KeyValueStore>, tz: Tz) -> Self {
        Self {
            state: AppState::new(),
            settings_store: SettingsStore::new(store.clone()),
            cache: UvCache::new(store),
            services,
            places: None,
            tz,
            clock: Utc::now,
        }
    }

    pub fn with_places(mut self, places: PlaceTable) -> Self {
        self.places = Some(places);
        self
    }

    /// Replace the wall clock used for cache freshness and fetch timestamps
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn places(&self) -> Option<&PlaceTable> {
        self.places.as_ref()
    }

    /// Load persisted settings and show cached data or begin a fetch
    pub fn start(&mut self) {
        let settings = self.settings_store.load_or_default();
        self.dispatch(Event::Started { settings });
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.dispatch(Event::TabSelected(tab));
    }

    /// Save `settings` and refresh. Returns false when validation refused them.
    pub fn submit_settings(&mut self, settings: Settings) -> bool {
        self.dispatch(Event::SettingsSubmitted(settings));
        !self.state.form_issues.iter().any(|issue| issue.is_blocking())
    }

    /// Submit the coordinates of a "City, ST" entry from the place table
    pub fn submit_place(&mut self, name: &str, skin_type: &str) -> bool {
        let Some(places) = self.places.as_ref() else {
            tracing::warn!("No place table loaded, cannot look up {}", name);
            self.state.notice = Some(format!("Unknown place: {}", name));
            return false;
        };
        let Some(coords) = places.lookup(name) else {
            tracing::warn!("Unknown place: {}", name);
            // Offer names sharing the city part
            let city = name.split(',').next().unwrap_or(name);
            let similar = places.suggest(city, PLACE_SUGGESTIONS);
            self.state.notice = Some(if similar.is_empty() {
                format!("Unknown place: {}", name)
            } else {
                format!("Unknown place: {}. Did you mean {}?", name, similar.join(", "))
            });
            return false;
        };

        let settings = Settings::new(
            format!("{:.*}", PLACE_PRECISION, coords.latitude),
            format!("{:.*}", PLACE_PRECISION, coords.longitude),
            skin_type,
        );
        self.submit_settings(settings)
    }

    /// Forced refresh; also serves as Retry from the error view
    pub fn refresh(&mut self) {
        self.dispatch(Event::RefreshRequested);
    }

    /// Highlight the sample for dial position `hour` (1..=12)
    pub fn select_hour(&mut self, hour: u32) -> Option<UvSample> {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let data = self.state.data.as_ref()?;
        let now = (self.clock)();
        let window = DisplayWindow::for_now(&now.with_timezone(&self.tz));
        let sample = dial::select_hour(&data.points(), &window, hour, &self.tz)?;

        self.dispatch(Event::SampleSelected(sample.time));
        Some(sample)
    }

    /// Highlight the sample under a click on a `width` x `height` dial
    pub fn click(&mut self, x: f64, y: f64, width: f64, height: f64) -> Option<UvSample> {
        let hour = dial::hour_at(x, y, width, height);
        tracing::debug!("Dial click ({}, {}) -> {}", x, y, hour);
        self.select_hour(hour)
    }

    /// Drain fetch results without blocking. Returns how many were handled.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.services.try_recv_uv_message() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Block until no fetch is in flight or `timeout` passes.
    /// Returns true once idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();

        while self.state.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!("Timed out waiting for UV data");
                return false;
            }
            match self.services.recv_uv_message_timeout(remaining) {
                Some(message) => self.handle_message(message),
                None => {
                    tracing::warn!("Timed out waiting for UV data");
                    return false;
                }
            }
        }
        true
    }

    pub fn render(&self) -> String {
        render::render(&self.state, (self.clock)(), &self.tz)
    }

    /// SVG of the dial, or `None` without data
    pub fn dial_svg(&self) -> Option<String> {
        let dial = render::dial_for(&self.state, (self.clock)(), &self.tz)?;
        let label = render::format_time(dial.center.sample.time, &self.tz);
        Some(dial::to_svg(&dial, &label))
    }

    pub fn shutdown(&self) {
        self.services.shutdown();
    }

    fn handle_message(&mut self, message: UvServiceMessage) {
        match message {
            UvServiceMessage::FetchDone { request_id, result } => {
                let fetched_at = (self.clock)();
                self.dispatch(Event::FetchCompleted {
                    request_id,
                    fetched_at,
                    result,
                });
            }
        }
    }

    fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in self.state.update(event) {
                if let Some(next) = self.execute(effect) {
                    queue.push_back(next);
                }
            }
        }
    }

    fn execute(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SaveSettings(settings) => {
                if let Err(e) = self.settings_store.save(&settings) {
                    let err = storage_write_error(SETTINGS_KEY, &e);
                    tracing::error!("{}", err);
                    self.state.notice = Some(err.user_message().to_string());
                }
                None
            }

            Effect::LoadCache => {
                let now = (self.clock)();
                let cached = self
                    .cache
                    .load_at(now)
                    .map(|data| (data, self.cache.last_updated().unwrap_or(now)));
                Some(Event::CacheLoaded(cached))
            }

            Effect::Fetch {
                request_id,
                latitude,
                longitude,
            } => {
                let cancel = self.services.new_fetch_cancel_token();
                request_uv_fetch(
                    &self.services.uv_service_tx(),
                    self.services.runtime(),
                    self.services.provider(),
                    request_id,
                    latitude,
                    longitude,
                    cancel,
                );
                None
            }

            Effect::CacheDataset { data, fetched_at } => {
                if let Err(e) = self.cache.save_at(&data, fetched_at) {
                    tracing::warn!("Failed to cache UV data: {}", e);
                }
                None
            }
        }
    }
}
