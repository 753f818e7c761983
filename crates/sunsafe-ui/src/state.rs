//! Application state and the pure update function that drives it.
//!
//! `AppState::update` never performs I/O. It returns [`Effect`]s that the
//! controller executes, feeding results back in as new [`Event`]s.

use chrono::{DateTime, Utc};
use sunsafe_core::{AppError, UvError as CoreUvError};
use sunsafe_uv::{Settings, SettingsIssue, UvDataset};

use crate::services::UvFetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Settings,
}

/// What the Home tab shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    NoSettings,
    NoData,
    Content,
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum Event {
    /// App launch with whatever settings were persisted
    Started { settings: Settings },
    /// Result of the cache lookup requested by [`Effect::LoadCache`]
    CacheLoaded(Option<(UvDataset, DateTime<Utc>)>),
    TabSelected(Tab),
    SettingsSubmitted(Settings),
    RefreshRequested,
    FetchCompleted {
        request_id: u64,
        fetched_at: DateTime<Utc>,
        result: Result<UvDataset, UvFetchError>,
    },
    SampleSelected(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SaveSettings(Settings),
    LoadCache,
    Fetch {
        request_id: u64,
        latitude: String,
        longitude: String,
    },
    CacheDataset {
        data: UvDataset,
        fetched_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub settings: Settings,
    pub data: Option<UvDataset>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Highlighted dial sample; `None` means the current reading
    pub selected_time: Option<DateTime<Utc>>,
    /// One-shot message for the user, e.g. why a submit was refused
    pub notice: Option<String>,
    pub form_issues: Vec<SettingsIssue>,
    error: Option<String>,
    checking_cache: bool,
    latest_request: u64,
    in_flight: Option<u64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tab: Tab::Home,
            settings: Settings::default(),
            data: None,
            last_updated: None,
            selected_time: None,
            notice: None,
            form_issues: Vec::new(),
            error: None,
            checking_cache: false,
            latest_request: 0,
            in_flight: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewState {
        if self.checking_cache || self.in_flight.is_some() {
            ViewState::Loading
        } else if !self.settings.is_complete() {
            ViewState::NoSettings
        } else if let Some(message) = &self.error {
            ViewState::Error {
                message: message.clone(),
            }
        } else if self.data.is_none() {
            ViewState::NoData
        } else {
            ViewState::Content
        }
    }

    /// Id of the fetch whose response will be accepted, if one is running
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.checking_cache || self.in_flight.is_some()
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Started { settings } => {
                self.settings = settings;
                if !self.settings.is_complete() {
                    tracing::info!("Settings incomplete, opening settings");
                    self.tab = Tab::Settings;
                    return Vec::new();
                }
                self.checking_cache = true;
                vec![Effect::LoadCache]
            }

            Event::CacheLoaded(cached) => {
                self.checking_cache = false;
                match cached {
                    Some((data, fetched_at)) => {
                        tracing::info!("Using cached UV data from {}", fetched_at);
                        self.show_dataset(data, fetched_at);
                        Vec::new()
                    }
                    None => self.start_fetch(),
                }
            }

            Event::TabSelected(tab) => {
                self.tab = tab;
                Vec::new()
            }

            Event::SettingsSubmitted(settings) => {
                let issues = settings.validate();
                let blocking: Vec<SettingsIssue> =
                    issues.iter().filter(|i| i.is_blocking()).cloned().collect();
                if !blocking.is_empty() {
                    self.notice = Some(
                        blocking
                            .iter()
                            .map(|i| i.to_string())
                            .collect::<Vec<_>>()
                            .join("; "),
                    );
                    self.form_issues = issues;
                    self.tab = Tab::Settings;
                    return Vec::new();
                }

                self.form_issues = issues;
                self.notice = None;
                self.settings = settings.clone();
                self.selected_time = None;
                self.tab = Tab::Home;

                let mut effects = vec![Effect::SaveSettings(settings)];
                effects.extend(self.start_fetch());
                effects
            }

            Event::RefreshRequested => {
                if !self.settings.is_complete() {
                    self.notice = Some(
                        AppError::from(CoreUvError::SettingsIncomplete)
                            .user_message()
                            .to_string(),
                    );
                    self.tab = Tab::Settings;
                    return Vec::new();
                }
                self.start_fetch()
            }

            Event::FetchCompleted {
                request_id,
                fetched_at,
                result,
            } => {
                if request_id != self.latest_request {
                    tracing::debug!(
                        "Discarding stale UV response #{} (latest #{})",
                        request_id,
                        self.latest_request
                    );
                    return Vec::new();
                }
                self.in_flight = None;

                match result {
                    Ok(data) => {
                        self.show_dataset(data.clone(), fetched_at);
                        vec![Effect::CacheDataset { data, fetched_at }]
                    }
                    Err(e) => {
                        tracing::error!("Failed to fetch UV data: {}", e);
                        self.error = Some(AppError::from(e).user_message().to_string());
                        Vec::new()
                    }
                }
            }

            Event::SampleSelected(time) => {
                if self.data.is_some() {
                    self.selected_time = Some(time);
                }
                Vec::new()
            }
        }
    }

    fn start_fetch(&mut self) -> Vec<Effect> {
        self.latest_request += 1;
        self.in_flight = Some(self.latest_request);
        self.error = None;
        tracing::debug!("Starting UV fetch #{}", self.latest_request);

        vec![Effect::Fetch {
            request_id: self.latest_request,
            latitude: self.settings.latitude.clone(),
            longitude: self.settings.longitude.clone(),
        }]
    }

    fn show_dataset(&mut self, data: UvDataset, fetched_at: DateTime<Utc>) {
        self.data = Some(data);
        self.last_updated = Some(fetched_at);
        self.selected_time = None;
        self.error = None;
    }
}
