//! Tests for appointment intake.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{AlwaysAvailable, MockBookingService, MockSlotAvailability};
use crate::domain::{BookingWindow, SchedulingValidator};
use crate::test_support::june_first_clock;

fn validator() -> SchedulingValidator {
    SchedulingValidator::new(june_first_clock(), BookingWindow::default())
}

fn draft(doctor: &str, date: &str, time: &str, description: &str) -> AppointmentDraft {
    let mut draft = AppointmentDraft::new();
    draft
        .select_doctor(doctor)
        .enter_date(date)
        .select_time(time)
        .describe(description);
    draft
}

fn never_books() -> MockBookingService {
    let mut booking = MockBookingService::new();
    booking.expect_book().times(0);
    booking
}

fn make_intake(
    booking: MockBookingService,
) -> AppointmentIntake<AlwaysAvailable, MockBookingService> {
    AppointmentIntake::new(validator(), Arc::new(AlwaysAvailable), Arc::new(booking))
}

#[tokio::test]
async fn books_a_valid_draft_exactly_once() {
    let mut booking = MockBookingService::new();
    booking
        .expect_book()
        .withf(|request| {
            request.doctor_id() == "1"
                && request.date() == NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
                && request.time().to_string() == "10:00"
                && request.description() == "checkup"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let intake = make_intake(booking);
    let request = intake
        .submit(&draft("1", "15062025", "10:00", "checkup"))
        .await
        .expect("draft is valid");

    assert_eq!(request.doctor_id(), "1");
    assert_eq!(request.time().to_string(), "10:00");
}

#[rstest]
#[case(draft("1", "15/06/2025", "10:00", ""), vec![DraftField::Description])]
#[case(draft("", "15/06/2025", "", "checkup"), vec![DraftField::Doctor, DraftField::Time])]
#[tokio::test]
async fn rejects_missing_fields_without_booking(
    #[case] draft: AppointmentDraft,
    #[case] expected: Vec<DraftField>,
) {
    let intake = make_intake(never_books());

    let err = intake.submit(&draft).await.expect_err("fields missing");

    match err {
        IntakeError::Rejected(IntakeRejection::MissingFields { fields }) => {
            assert_eq!(fields, expected);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[rstest]
#[case("01/01/2099")]
#[case("31/02/2025")]
#[case("15/06")]
#[case("31/05/2025")]
#[tokio::test]
async fn rejects_invalid_dates_without_booking(#[case] date: &str) {
    let intake = make_intake(never_books());

    let err = intake
        .submit(&draft("1", date, "10:00", "checkup"))
        .await
        .expect_err("date invalid");

    assert!(
        matches!(err, IntakeError::Rejected(IntakeRejection::InvalidDate(_))),
        "unexpected outcome: {err:?}"
    );
}

#[rstest]
#[case("10:15")]
#[case("18:00")]
#[case("ten")]
#[tokio::test]
async fn rejects_off_grid_times_without_booking(#[case] time: &str) {
    let intake = make_intake(never_books());

    let err = intake
        .submit(&draft("1", "15/06/2025", time, "checkup"))
        .await
        .expect_err("time invalid");

    assert!(
        matches!(err, IntakeError::Rejected(IntakeRejection::InvalidTime(_))),
        "unexpected outcome: {err:?}"
    );
}

#[tokio::test]
async fn rejects_unavailable_slot_without_booking() {
    let mut availability = MockSlotAvailability::new();
    availability
        .expect_is_available()
        .withf(|doctor, _, slot| doctor == "2" && slot.to_string() == "09:30")
        .times(1)
        .return_once(|_, _, _| Ok(false));
    let intake = AppointmentIntake::new(
        validator(),
        Arc::new(availability),
        Arc::new(never_books()),
    );

    let err = intake
        .submit(&draft("2", "15/06/2025", "09:30", "rash"))
        .await
        .expect_err("slot taken");

    assert!(
        matches!(
            err,
            IntakeError::Rejected(IntakeRejection::SlotUnavailable { .. })
        ),
        "unexpected outcome: {err:?}"
    );
}

#[tokio::test]
async fn availability_failure_propagates_as_service_unavailable() {
    let mut availability = MockSlotAvailability::new();
    availability
        .expect_is_available()
        .times(1)
        .return_once(|_, _, _| Err(SlotAvailabilityError::unavailable("offline")));
    let intake = AppointmentIntake::new(
        validator(),
        Arc::new(availability),
        Arc::new(never_books()),
    );

    let err = intake
        .submit(&draft("1", "15/06/2025", "10:00", "checkup"))
        .await
        .expect_err("lookup failed");

    match err {
        IntakeError::Collaborator(error) => {
            assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[rstest]
#[case(BookingServiceError::slot_taken("10:00"), ErrorCode::Conflict)]
#[case(BookingServiceError::unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(BookingServiceError::rejected("nope"), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn booking_failure_propagates_without_retry(
    #[case] failure: BookingServiceError,
    #[case] expected: ErrorCode,
) {
    let mut booking = MockBookingService::new();
    booking
        .expect_book()
        .times(1)
        .return_once(move |_| Err(failure));
    let intake = make_intake(booking);

    let err = intake
        .submit(&draft("1", "15/06/2025", "10:00", "checkup"))
        .await
        .expect_err("booking failed");

    match err {
        IntakeError::Collaborator(error) => assert_eq!(error.code(), expected),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_fields_message_lists_every_field() {
    let rejection = IntakeRejection::MissingFields {
        fields: vec![DraftField::Doctor, DraftField::Description],
    };
    assert_eq!(
        rejection.to_string(),
        "missing required fields: doctor, description"
    );
}
