/// Current UTC time as stored in `TIMESTAMP` columns.
pub fn now_utc() -> time::PrimitiveDateTime {
    let now = time::OffsetDateTime::now_utc();
    time::PrimitiveDateTime::new(now.date(), now.time())
}

/// Unix seconds of a UTC `TIMESTAMP` value, the form used on the wire.
pub fn unix_seconds(ts: time::PrimitiveDateTime) -> i64 {
    ts.assume_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_unix_seconds() {
        assert_eq!(unix_seconds(datetime!(1970-01-01 0:00:00)), 0);
        assert_eq!(unix_seconds(datetime!(2024-03-01 12:00:00)), 1_709_294_400);
    }
}
