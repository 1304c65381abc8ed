//! Backend API tests against a wiremock server
//!
//! Each test mounts the Frappe-style responses the client expects and checks
//! both the request it sends and the way it unwraps or normalizes the reply.

use masar::api::types::{ApplyActionRequest, DocumentFilters};
use masar::config::BackendConfig;
use masar::workflows::{Action, ActionMenu, WorkflowState, WorkflowView};
use masar::{ApiError, MasarClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODULE: &str = "masar_dms.api";
const DOCTYPE: &str = "Masar Document";

/// Backend mock server for deterministic testing
struct BackendMock {
    server: MockServer,
}

impl BackendMock {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn client(&self) -> MasarClient {
        let config = BackendConfig {
            base_url: self.server.uri(),
            ..Default::default()
        };
        MasarClient::new(&config).unwrap()
    }

    fn method_path(method: &str) -> String {
        format!("/api/method/{MODULE}.{method}")
    }

    async fn mock_get(&self, method_name: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(Self::method_path(method_name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    async fn mock_document(&self, name: &str, state: &str) {
        Mock::given(method("GET"))
            .and(path(Self::method_path("document.get_document")))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {
                    "success": true,
                    "data": {
                        "name": name,
                        "owner": "eng@contractor.example",
                        "workflow_state": state,
                        "discipline": "Electrical"
                    }
                }
            })))
            .mount(&self.server)
            .await;
    }
}

fn ok(data: Value) -> Value {
    json!({ "message": { "success": true, "data": data } })
}

#[tokio::test]
async fn available_actions_are_parsed_in_order() {
    let mock = BackendMock::new().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::method_path("workflow.get_available_actions")))
        .and(query_param("doctype", DOCTYPE))
        .and(query_param("name", "DCS-GEN-036"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "actions": [
                {"action": "Approve", "action_ar": "اعتماد"},
                {"action": "Approve With Notes", "action_ar": "اعتماد مع ملاحظات"},
                {"action": "Reject", "action_ar": "رفض"}
            ]
        }))))
        .expect(1)
        .mount(&mock.server)
        .await;

    let actions = mock
        .client()
        .get_available_actions(DOCTYPE, "DCS-GEN-036")
        .await
        .unwrap();

    let names: Vec<Action> = actions.iter().map(|a| a.action.clone()).collect();
    assert_eq!(names, vec![Action::Approve, Action::ApproveWithNotes, Action::Reject]);
    assert_eq!(actions[2].action_ar.as_deref(), Some("رفض"));
}

#[tokio::test]
async fn apply_action_posts_notes_and_returns_delta() {
    let mock = BackendMock::new().await;
    Mock::given(method("POST"))
        .and(path(BackendMock::method_path("workflow.apply_action")))
        .and(body_json(json!({
            "doctype": DOCTYPE,
            "name": "DCS-GEN-036",
            "action": "Approve With Notes",
            "notes": "Update cable schedule"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "new_state": "Approved With Notes",
            "modified": "2024-03-06 08:00:00.000000",
            "modified_by": "consultant@example.com"
        }))))
        .expect(1)
        .mount(&mock.server)
        .await;

    let delta = mock
        .client()
        .apply_action(&ApplyActionRequest {
            doctype: DOCTYPE.to_string(),
            name: "DCS-GEN-036".to_string(),
            action: Action::ApproveWithNotes,
            notes: Some("Update cable schedule".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(delta.new_state, WorkflowState::ApprovedWithNotes);
    assert_eq!(delta.modified_by.as_deref(), Some("consultant@example.com"));
}

#[tokio::test]
async fn server_messages_become_the_error_text() {
    let mock = BackendMock::new().await;
    let inner = json!({"message": "You are not allowed to apply Reject"}).to_string();
    Mock::given(method("POST"))
        .and(path(BackendMock::method_path("workflow.apply_action")))
        .respond_with(ResponseTemplate::new(417).set_body_json(json!({
            "exc_type": "ValidationError",
            "_server_messages": serde_json::to_string(&vec![inner]).unwrap()
        })))
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let err = client
        .apply_action(&ApplyActionRequest {
            doctype: DOCTYPE.to_string(),
            name: "DCS-GEN-036".to_string(),
            action: Action::Reject,
            notes: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Http { status: 417, .. }));
    assert_eq!(err.user_message(), "You are not allowed to apply Reject");
    assert_eq!(client.metrics().get_stats().errors, 1);
}

#[tokio::test]
async fn logical_failure_in_200_response_is_rejected() {
    let mock = BackendMock::new().await;
    mock.mock_get(
        "workflow.get_workflow_history",
        json!({"message": {"success": false, "message": "Document DCS-GEN-999 not found"}}),
    )
    .await;

    let err = mock
        .client()
        .get_workflow_history(DOCTYPE, "DCS-GEN-999")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Rejected { .. }));
    assert_eq!(err.user_message(), "Document DCS-GEN-999 not found");
}

#[tokio::test]
async fn state_list_is_cached_between_calls() {
    let mock = BackendMock::new().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::method_path("workflow.get_all_states")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "states": [
                {"name": "Draft – Contractor Specialist Engineer"},
                {"name": "Under Review – Consultant"},
                {"name": "Approved"}
            ]
        }))))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let first = client.get_all_states().await.unwrap();
    let second = client.get_all_states().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0], WorkflowState::Draft);
    assert_eq!(first[2], WorkflowState::Approved);
    assert_eq!(client.metrics().get_stats().cache_hits, 1);
}

#[tokio::test]
async fn login_cookie_is_sent_on_later_requests() {
    let mock = BackendMock::new().await;
    Mock::given(method("POST"))
        .and(path("/api/method/login"))
        .and(body_json(json!({"usr": "eng@contractor.example", "pwd": "secret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "sid=abc123; Path=/; HttpOnly")
                .set_body_json(json!({"message": "Logged In", "full_name": "Site Engineer"})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/method/frappe.auth.get_logged_user"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "eng@contractor.example"})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let login = client.login("eng@contractor.example", "secret").await.unwrap();
    assert_eq!(login.full_name.as_deref(), Some("Site Engineer"));

    let user = client.logged_user().await.unwrap();
    assert_eq!(user, "eng@contractor.example");
}

#[tokio::test]
async fn document_listing_sends_filters() {
    let mock = BackendMock::new().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::method_path("document.get_documents")))
        .and(query_param("discipline", "Civil"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "documents": [
                {"name": "DCS-CIV-011", "owner": "a@example.com", "workflow_state": "Rejected", "discipline": "Civil"}
            ],
            "total": 11,
            "page": 2
        }))))
        .expect(1)
        .mount(&mock.server)
        .await;

    let page = mock
        .client()
        .get_documents(&DocumentFilters {
            discipline: Some("Civil".to_string()),
            page: 2,
            page_size: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.documents.len(), 1);
    assert_eq!(page.documents[0].workflow_state, WorkflowState::Rejected);
    assert_eq!(page.total, Some(11));
}

#[tokio::test]
async fn parties_can_be_filtered_by_project() {
    let mock = BackendMock::new().await;
    Mock::given(method("GET"))
        .and(path(BackendMock::method_path("party.get_parties")))
        .and(query_param("project", "PRJ-0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "parties": [
                {"name": "PTY-01", "party_type": "Consultant", "party_name": "Gulf Engineering"},
                {"name": "PTY-02", "party_type": "Contractor", "party_name": "Desert Builders"}
            ]
        }))))
        .mount(&mock.server)
        .await;

    let parties = mock.client().get_parties(Some("PRJ-0001")).await.unwrap();
    assert_eq!(parties.len(), 2);
    assert_eq!(parties[0].party_type.as_deref(), Some("Consultant"));
}

#[tokio::test]
async fn workflow_view_round_trip_over_http() {
    let mock = BackendMock::new().await;
    mock.mock_document("DCS-GEN-036", "Draft – Contractor Specialist Engineer").await;
    mock.mock_get(
        "workflow.get_available_actions",
        ok(json!({"actions": [{"action": "Submit", "action_ar": "إرسال"}]})),
    )
    .await;
    mock.mock_get("workflow.get_workflow_history", ok(json!({"history": []}))).await;
    mock.mock_get(
        "workflow.get_all_states",
        ok(json!({"states": [
            {"name": "Draft – Contractor Specialist Engineer"},
            {"name": "Under Review – Consultant"}
        ]})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(BackendMock::method_path("workflow.apply_action")))
        .and(body_json(json!({"doctype": DOCTYPE, "name": "DCS-GEN-036", "action": "Submit"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "new_state": "Under Review – Consultant",
            "modified": "2024-03-06 08:00:00",
            "modified_by": "eng@contractor.example"
        }))))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = mock.client();
    let mut view = WorkflowView::load(&client, DOCTYPE, "DCS-GEN-036").await.unwrap();
    assert!(matches!(view.action_menu(), ActionMenu::Available(actions) if actions.len() == 1));

    let prompt = view.select_action(&Action::Submit).unwrap();
    let outcome = view.confirm(prompt).await.unwrap();

    assert_eq!(outcome.previous_state, WorkflowState::Draft);
    assert_eq!(view.document().workflow_state.as_str(), "Under Review – Consultant");
    assert!(outcome.history_len_after >= outcome.history_len_before);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let config = BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
        ..Default::default()
    };
    let client = MasarClient::new(&config).unwrap();

    let err = client.get_all_states().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.user_message().is_empty());
}

#[tokio::test]
async fn login_with_unexpected_body_keeps_the_session() {
    let mock = BackendMock::new().await;
    Mock::given(method("POST"))
        .and(path("/api/method/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "sid=def456; Path=/; HttpOnly")
                .set_body_json(json!({"message": 42, "full_name": ["not", "a", "name"]})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let login = mock.client().login("eng@contractor.example", "secret").await.unwrap();
    assert!(login.message.is_none());
    assert!(login.full_name.is_none());
}
