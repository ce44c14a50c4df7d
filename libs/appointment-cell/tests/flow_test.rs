use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::{
    AppointmentService, BookingError, ConfirmationFlow, ContactField, FlowState, SLOT_TAKEN_MESSAGE,
};
use shared_utils::test_utils::{FixedClock, MockClinicResponses, TestConfig};

const CREATE_PATH: &str = "/api/doctors/doctors/5/create-appointment/";

fn service_for(server: &MockServer) -> AppointmentService {
    let context = TestConfig::with_api(&server.uri()).to_ru_context(FixedClock::on("2024-07-01", 8, 0));
    AppointmentService::new(context.api.clone())
}

fn filled_flow() -> ConfirmationFlow {
    let mut flow = ConfirmationFlow::new(5, 42);
    flow.set_field(ContactField::Name, "Иван");
    flow.set_field(ContactField::Phone, "+996700123456");
    flow
}

fn now() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_successful_submission_posts_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "time_slot_id": 42,
            "full_name": "Иван",
            "phone_number": "+996700123456",
            "comment": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockClinicResponses::appointment_response(5, 42)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut flow = filled_flow();
    flow.submit(&service_for(&mock_server)).await.unwrap();

    assert_eq!(flow.state(), FlowState::Succeeded);
    assert!(flow.last_error().is_none());

    // Terminal: a second submit is refused without touching the backend
    let second = flow.submit(&service_for(&mock_server)).await;
    assert_matches!(second, Err(BookingError::InvalidTransition { from: FlowState::Succeeded, .. }));
}

#[tokio::test]
async fn test_validation_failure_makes_no_request() {
    let mock_server = MockServer::start().await;

    let mut flow = ConfirmationFlow::new(5, 42);
    flow.set_field(ContactField::Name, "И");
    flow.set_field(ContactField::Phone, "+99612345678");

    let result = flow.submit(&service_for(&mock_server)).await;

    assert_matches!(result, Err(BookingError::Validation(ref errors)) if errors.len() == 2);
    assert_eq!(flow.state(), FlowState::Idle);
    assert!(flow.error_for(ContactField::Name).is_some());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_conflict_reports_slot_taken() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockClinicResponses::error_response("already booked")))
        .mount(&mock_server)
        .await;

    let mut flow = filled_flow();
    let result = flow.submit(&service_for(&mock_server)).await;

    assert_matches!(result, Err(BookingError::SlotTaken));
    assert_eq!(flow.state(), FlowState::Failed);
    assert_eq!(flow.last_error().unwrap().user_message(), SLOT_TAKEN_MESSAGE);
}

#[tokio::test]
async fn test_backend_message_surfaces_and_retry_posts_again() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockClinicResponses::error_response("Пациент заблокирован")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let mut flow = filled_flow();

    let first = flow.submit(&service).await.unwrap_err();
    assert_eq!(first.user_message(), "Пациент заблокирован");
    assert_eq!(flow.state(), FlowState::Failed);

    let second = flow.submit(&service).await.unwrap_err();
    assert_matches!(second, BookingError::Api(_));
}

#[tokio::test]
async fn test_error_without_body_uses_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut flow = filled_flow();
    let err = flow.submit(&service_for(&mock_server)).await.unwrap_err();

    assert_eq!(err.user_message(), "Ошибка создания записи: 500");
}

#[tokio::test]
async fn test_cancel_makes_no_request() {
    let mock_server = MockServer::start().await;

    let flow = filled_flow();
    assert_eq!(flow.cancel(), "/doctors/5");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_confirmation_missing_slot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/doctors/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::doctor_response(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/time-slots/42/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).load_confirmation(5, 42, now()).await;
    assert_matches!(result, Err(BookingError::SlotNotFound));
}

#[tokio::test]
async fn test_load_confirmation_unavailable_slot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/doctors/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::doctor_response(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/time-slots/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::slot_response(42, 5, "2024-07-01", "10:00:00", false),
        ))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).load_confirmation(5, 42, now()).await;
    assert_matches!(result, Err(BookingError::SlotTaken));
}

#[tokio::test]
async fn test_load_confirmation_past_slot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/doctors/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::doctor_response(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/time-slots/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::slot_response(42, 5, "2024-07-01", "07:45:00", true),
        ))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).load_confirmation(5, 42, now()).await;
    assert_matches!(result, Err(BookingError::SlotInPast));
}

#[tokio::test]
async fn test_load_confirmation_slot_of_other_doctor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/doctors/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::doctor_response(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/time-slots/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::slot_response(42, 6, "2024-07-01", "10:00:00", true),
        ))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).load_confirmation(5, 42, now()).await;
    assert_matches!(result, Err(BookingError::SlotNotFound));
}
