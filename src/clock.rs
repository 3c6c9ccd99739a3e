use chrono::{Local, Utc};

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Human-readable stamp used for `TeamRecord::last_updated`.
    fn now_label(&self) -> String {
        Local::now().format("%b %-d, %Y %-I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn now_label(&self) -> String {
        (**self).now_label()
    }
}
