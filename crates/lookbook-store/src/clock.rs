/// Current wall-clock time as epoch milliseconds, the timestamp unit used
/// by both persisted aggregates.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
