// tests/attendance_tests.rs

use bakehouse_core::attendance::{total_hours, AttendanceAction, AttendanceTimes};
use bakehouse_core::DomainError;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn at(h: u32, m: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap()
}

fn full_shift() -> AttendanceTimes {
  let mut t = AttendanceTimes::default();
  t.apply(AttendanceAction::CheckIn, at(6, 0)).unwrap();
  t.apply(AttendanceAction::BreakStart, at(10, 0)).unwrap();
  t.apply(AttendanceAction::BreakEnd, at(10, 30)).unwrap();
  t.apply(AttendanceAction::CheckOut, at(14, 45)).unwrap();
  t
}

#[test]
fn hours_are_shift_minus_break() {
  let t = full_shift();
  assert_eq!(t.break_duration(), Duration::minutes(30));
  assert_eq!(t.worked_duration(), Some(Duration::minutes(8 * 60 + 15)));
  assert_eq!(t.hours_worked(), 8.25);
}

#[test]
fn open_shift_has_no_worked_duration() {
  let mut t = AttendanceTimes::default();
  t.apply(AttendanceAction::CheckIn, at(6, 0)).unwrap();
  assert_eq!(t.worked_duration(), None);
  assert_eq!(t.hours_worked(), 0.0);
}

#[test]
fn shift_without_break() {
  let mut t = AttendanceTimes::default();
  t.apply(AttendanceAction::CheckIn, at(7, 0)).unwrap();
  t.apply(AttendanceAction::CheckOut, at(9, 20)).unwrap();
  assert_eq!(t.hours_worked(), 2.33);
}

#[test]
fn worked_duration_is_floored_at_zero() {
  // Records edited directly in the database can carry a break longer than the shift.
  let t = AttendanceTimes {
    check_in: Some(at(8, 0)),
    break_start: Some(at(7, 0)),
    break_end: Some(at(12, 0)),
    check_out: Some(at(9, 0)),
  };
  assert_eq!(t.worked_duration(), Some(Duration::zero()));
  assert_eq!(t.hours_worked(), 0.0);
}

#[test]
fn out_of_order_actions_are_rejected() {
  let mut t = AttendanceTimes::default();
  assert!(matches!(
    t.apply(AttendanceAction::CheckOut, at(9, 0)),
    Err(DomainError::InvalidTransition(_))
  ));
  assert!(t.apply(AttendanceAction::BreakStart, at(9, 0)).is_err());
  assert!(t.apply(AttendanceAction::BreakEnd, at(9, 0)).is_err());

  t.apply(AttendanceAction::CheckIn, at(6, 0)).unwrap();
  assert!(t.apply(AttendanceAction::CheckIn, at(6, 5)).is_err());

  t.apply(AttendanceAction::BreakStart, at(10, 0)).unwrap();
  assert!(t.on_break());
  assert_eq!(
    t.apply(AttendanceAction::CheckOut, at(11, 0)),
    Err(DomainError::InvalidTransition(
      "End the current break before checking out.".to_string()
    ))
  );
  assert!(t.apply(AttendanceAction::BreakEnd, at(9, 0)).is_err(), "break end before break start");
  t.apply(AttendanceAction::BreakEnd, at(10, 15)).unwrap();
  assert!(t.apply(AttendanceAction::BreakStart, at(11, 0)).is_err(), "one break per day");

  t.apply(AttendanceAction::CheckOut, at(14, 0)).unwrap();
  assert!(t.apply(AttendanceAction::CheckOut, at(15, 0)).is_err());
}

#[test]
fn check_out_cannot_precede_check_in() {
  let mut t = AttendanceTimes::default();
  t.apply(AttendanceAction::CheckIn, at(9, 0)).unwrap();
  assert!(t.apply(AttendanceAction::CheckOut, at(8, 59)).is_err());
}

#[test]
fn lateness_against_schedule() {
  let scheduled = NaiveDate::from_ymd_opt(2026, 10, 19)
    .unwrap()
    .and_hms_opt(6, 0, 0)
    .unwrap();
  let mut t = AttendanceTimes::default();
  assert_eq!(t.minutes_late(scheduled, 5), 0);

  t.apply(AttendanceAction::CheckIn, at(6, 4)).unwrap();
  assert_eq!(t.minutes_late(scheduled, 5), 0);

  let mut late = AttendanceTimes::default();
  late.apply(AttendanceAction::CheckIn, at(6, 20)).unwrap();
  assert_eq!(late.minutes_late(scheduled, 5), 20);

  // Past the grace window the whole delay counts, not the excess.
  let mut edge = AttendanceTimes::default();
  edge.apply(AttendanceAction::CheckIn, at(6, 5)).unwrap();
  assert_eq!(edge.minutes_late(scheduled, 5), 0);
  let mut past = AttendanceTimes::default();
  past.apply(AttendanceAction::CheckIn, at(6, 6)).unwrap();
  assert_eq!(past.minutes_late(scheduled, 5), 6);
}

#[test]
fn action_parsing() {
  assert_eq!("break-start".parse::<AttendanceAction>(), Ok(AttendanceAction::BreakStart));
  assert!("lunch".parse::<AttendanceAction>().is_err());
  assert_eq!(AttendanceAction::CheckOut.to_string(), "check-out");
}

#[test]
fn totals_skip_open_shifts() {
  let mut open = AttendanceTimes::default();
  open.apply(AttendanceAction::CheckIn, at(6, 0)).unwrap();
  assert_eq!(total_hours(&[full_shift(), open, full_shift()]), 16.5);
}
