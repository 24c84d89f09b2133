use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::OnceLock;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence, seeded randomly at start-up
///
/// The sequence wraps every 4096 ids, so ids generated in the same
/// millisecond by one process never collide.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static SEQUENCE: OnceLock<AtomicU16> = OnceLock::new();

    let seq = SEQUENCE
        .get_or_init(|| AtomicU16::new(rand::thread_rng().gen_range(0..0x1000)))
        .fetch_add(1, Ordering::Relaxed);
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    (ts << 12) | i64::from(seq & 0xFFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_snowflake_fits_js_safe_integer() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1i64 << 53));
    }

    #[test]
    fn test_snowflake_unique_in_burst() {
        let ids: HashSet<i64> = (0..4000).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 4000);
    }
}
