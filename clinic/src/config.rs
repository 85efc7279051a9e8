//! Client configuration loaded via OrthoConfig.
//!
//! Every field is optional; accessors fall back to the built-in defaults.
//! Values come from `CLINIC_*` environment variables or a configuration
//! file discovered by OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{BookingWindow, CounterSettings, SessionTimeouts};

const DEFAULT_STORAGE_DIR: &str = ".clinic";

/// Settings for the clinic client core.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct ClientSettings {
    /// Directory holding the persisted session.
    pub storage_dir: Option<PathBuf>,
    /// Limit for each auth service call, in milliseconds.
    pub auth_timeout_ms: Option<u64>,
    /// Limit for each storage call, in milliseconds.
    pub storage_timeout_ms: Option<u64>,
    /// Seconds between unread-count refreshes.
    pub unread_refresh_secs: Option<u64>,
    /// Limit for a single unread-count fetch, in milliseconds.
    pub unread_fetch_timeout_ms: Option<u64>,
    /// How many months ahead appointments may be booked.
    pub booking_window_months: Option<u32>,
}

fn millis_or(value: Option<u64>, default: Duration) -> Duration {
    value
        .filter(|ms| *ms > 0)
        .map_or(default, Duration::from_millis)
}

impl ClientSettings {
    /// Return the storage directory, falling back to `.clinic`.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    /// Collaborator timeouts for the session store. Zero means default.
    pub fn session_timeouts(&self) -> SessionTimeouts {
        SessionTimeouts {
            auth: millis_or(self.auth_timeout_ms, SessionTimeouts::DEFAULT_AUTH),
            storage: millis_or(self.storage_timeout_ms, SessionTimeouts::DEFAULT_STORAGE),
        }
    }

    /// Refresh timing for the notification counter. Zero means default.
    pub fn counter_settings(&self) -> CounterSettings {
        CounterSettings {
            refresh_interval: self
                .unread_refresh_secs
                .filter(|secs| *secs > 0)
                .map_or(CounterSettings::DEFAULT_REFRESH, Duration::from_secs),
            fetch_timeout: millis_or(
                self.unread_fetch_timeout_ms,
                CounterSettings::DEFAULT_FETCH_TIMEOUT,
            ),
        }
    }

    /// Bookable window, defaulting to three months.
    pub fn booking_window(&self) -> BookingWindow {
        self.booking_window_months
            .map_or_else(BookingWindow::default, BookingWindow::new)
    }
}
