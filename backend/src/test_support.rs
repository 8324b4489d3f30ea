//! Shared test doubles for unit tests.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock advancing by one second every time it is read.
///
/// Successive store writes therefore receive strictly increasing timestamps,
/// which keeps "most recently updated first" ordering deterministic.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.lock_clock();
        let current = *now;
        *now += TimeDelta::seconds(1);
        current
    }
}
