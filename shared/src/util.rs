/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC time, RFC 3339
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Opaque id for a cart line or local order.
///
/// Random, never derived from line content.
pub fn new_line_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ids_are_unique() {
        let a = new_line_id();
        let b = new_line_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_rfc3339_parses() {
        let s = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&s).is_ok());
        assert!(now_millis() > 1_704_067_200_000);
    }
}
