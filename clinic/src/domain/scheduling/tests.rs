//! Tests for slot generation, the date mask and the booking window.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::test_support::{FixtureClock, june_first_clock};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn validator(clock: Arc<FixtureClock>) -> SchedulingValidator {
    SchedulingValidator::new(clock, BookingWindow::default())
}

#[test]
fn generates_eighteen_increasing_slots_from_nine_to_half_past_five() {
    let slots: Vec<TimeSlot> = generate_time_slots().collect();

    assert_eq!(slots.len(), 18);
    assert_eq!(slots.first().map(ToString::to_string).as_deref(), Some("09:00"));
    assert_eq!(slots.last().map(ToString::to_string).as_deref(), Some("17:30"));
    assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(slots.iter().all(|slot| slot.hour() < CLOSING_HOUR));
}

#[test]
fn slot_generation_is_restartable() {
    let first: Vec<String> = generate_time_slots().map(String::from).collect();
    let second: Vec<String> = generate_time_slots().map(String::from).collect();
    assert_eq!(first, second);
    assert_eq!(generate_time_slots().len(), SLOT_COUNT);
}

#[rstest]
#[case("09:00")]
#[case("12:30")]
#[case("17:30")]
fn parses_grid_times(#[case] text: &str) {
    let slot: TimeSlot = text.parse().expect("grid time");
    assert_eq!(slot.to_string(), text);
}

#[rstest]
#[case("08:30", true)]
#[case("18:00", true)]
#[case("10:15", true)]
#[case("9:00", false)]
#[case("10h00", false)]
#[case("", false)]
#[case("ab:cd", false)]
fn rejects_off_grid_and_malformed_times(#[case] text: &str, #[case] well_formed: bool) {
    let err = text.parse::<TimeSlot>().expect_err("not a slot");
    assert_eq!(
        matches!(err, TimeSlotParseError::OffGrid { .. }),
        well_formed,
        "unexpected error {err:?} for {text:?}"
    );
}

#[rstest]
#[case("", "")]
#[case("1", "1")]
#[case("15", "15")]
#[case("150", "15/0")]
#[case("1506", "15/06")]
#[case("15062", "15/06/2")]
#[case("15062025", "15/06/2025")]
#[case("150620251999", "15/06/2025")]
#[case("15/06/2025", "15/06/2025")]
#[case("a1b5-0.6 2025", "15/06/2025")]
#[case("dd/mm", "")]
fn masks_date_input(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(format_date_input(raw), expected);
}

#[rstest]
#[case("1")]
#[case("15/0")]
#[case("15/06/2025")]
#[case("x9y9z9")]
fn masking_is_idempotent(#[case] raw: &str) {
    let once = format_date_input(raw);
    assert_eq!(format_date_input(&once), once);
}

#[test]
fn displayed_month_is_the_calendar_month() {
    assert_eq!(parse_date_text("05/03/2026"), Ok(date(2026, 3, 5)));
}

#[rstest]
#[case("15/06/25")]
#[case("15-06-2025")]
#[case("1/06/2025")]
#[case(" 15/06/2025")]
#[case("15/06/2025 ")]
#[case("15/06/20255")]
#[case("")]
fn malformed_text_never_validates(#[case] text: &str) {
    assert_eq!(parse_date_text(text), Err(DateValidationError::Malformed));
    assert!(!validator(june_first_clock()).validate_date(text));
}

#[rstest]
#[case("31/06/2025")]
#[case("00/07/2025")]
#[case("10/00/2025")]
#[case("10/13/2025")]
#[case("29/02/2027")]
fn nonexistent_dates_are_rejected_not_rolled_over(#[case] text: &str) {
    assert!(matches!(
        parse_date_text(text),
        Err(DateValidationError::NonexistentDate { .. })
    ));
}

#[test]
fn today_is_bookable() {
    let validator = validator(june_first_clock());
    let today = validator.today().format("%d/%m/%Y").to_string();
    assert!(validator.validate_date(&today));
}

#[test]
fn far_future_is_rejected() {
    assert!(!validator(june_first_clock()).validate_date("01/01/2099"));
}

#[rstest]
#[case("31/05/2025", false)]
#[case("01/06/2025", true)]
#[case("15/06/2025", true)]
#[case("01/09/2025", true)]
#[case("02/09/2025", false)]
fn window_is_inclusive_on_both_ends(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(validator(june_first_clock()).validate_date(text), expected);
}

#[test]
fn out_of_window_error_reports_bounds() {
    let err = validator(june_first_clock())
        .resolve_date("01/01/2099")
        .expect_err("outside window");
    assert_eq!(
        err,
        DateValidationError::OutsideWindow {
            earliest: date(2025, 6, 1),
            latest: date(2025, 9, 1),
        }
    );
}

#[rstest]
#[case(date(2026, 1, 31), date(2026, 4, 30))]
#[case(date(2025, 11, 30), date(2026, 2, 28))]
#[case(date(2027, 11, 30), date(2028, 2, 29))]
#[case(date(2026, 3, 15), date(2026, 6, 15))]
fn month_addition_clamps_to_end_of_month(#[case] today: NaiveDate, #[case] latest: NaiveDate) {
    assert_eq!(BookingWindow::default().bounds(today), (today, latest));
}

#[test]
fn validator_follows_the_clock() {
    let clock = june_first_clock();
    let validator = validator(Arc::clone(&clock));
    assert!(validator.validate_date("15/06/2025"));

    clock.set_date(date(2025, 6, 20));
    assert!(!validator.validate_date("15/06/2025"));
}

#[test]
fn custom_window_widens_the_range() {
    let validator = SchedulingValidator::new(june_first_clock(), BookingWindow::new(12));
    assert!(validator.validate_date("01/06/2026"));
    assert!(!validator.validate_date("02/06/2026"));
}
