use chrono::{DateTime, Local};

/// Env override used to pin the clock in replays and tests.
pub const FIXED_TIME_ENV: &str = "CD_FIXED_TIME";

pub fn now_local() -> DateTime<Local> {
    if let Ok(value) = std::env::var(FIXED_TIME_ENV) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
            return dt.with_timezone(&Local);
        }
    }
    Local::now()
}

/// Detection timestamp, ISO-8601 on the local clock.
pub fn iso_timestamp() -> String {
    now_local().to_rfc3339()
}

pub fn now_millis() -> i64 {
    now_local().timestamp_millis()
}
