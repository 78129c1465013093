use chrono::{NaiveDateTime, Utc};

/// Returns the current UTC time, as stored in the audit columns.
pub fn get_current_time() -> NaiveDateTime {
    Utc::now().naive_utc()
}
