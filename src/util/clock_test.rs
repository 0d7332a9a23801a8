use super::*;
use chrono::{FixedOffset, Utc};

#[test]
fn hour_minute_pads_to_two_digits() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
    assert_eq!(hour_minute(&at), "07:05");
}

#[test]
fn hour_minute_uses_the_given_offset() {
    let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap().with_timezone(&shanghai);
    assert_eq!(hour_minute(&at), "07:30");
}

#[test]
fn local_hour_minute_has_clock_shape() {
    let now = local_hour_minute();
    assert_eq!(now.len(), 5);
    assert_eq!(now.as_bytes()[2], b':');
}
