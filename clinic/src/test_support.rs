//! Shared test doubles for unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Identity, Role};

/// Clock pinned to noon UTC on a fixed day so the local date matches in
/// every realistic timezone.
pub struct FixtureClock(Mutex<DateTime<Utc>>);

impl FixtureClock {
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Self(Mutex::new(now))
    }

    pub fn set_date(&self, date: NaiveDate) {
        let now = date
            .and_hms_opt(12, 0, 0)
            .expect("valid fixture time")
            .and_utc();
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed "today" used across scheduling tests: 1 June 2025.
pub fn june_first_clock() -> Arc<FixtureClock> {
    Arc::new(FixtureClock::on(2025, 6, 1))
}

pub fn patient() -> Identity {
    Identity::try_new("42", "Ana Souza", Role::Patient, "https://img.test/ana.jpg")
        .expect("valid identity")
}

pub fn doctor() -> Identity {
    Identity::try_new("7", "Dr. João Silva", Role::Doctor, "").expect("valid identity")
}
