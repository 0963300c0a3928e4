use chrono::{NaiveDateTime, Utc};

/// Record identifier assigned by the store on insert.
pub type Id = i64;

/// Timestamp in UTC.
pub type Time = NaiveDateTime;

pub fn now() -> Time {
    Utc::now().naive_utc()
}
