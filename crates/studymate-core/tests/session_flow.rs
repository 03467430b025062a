mod common;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use common::{BASE, RecordingTransport, RecordingView, client};
use studymate_core::api::{ApiClient, Method};
use studymate_core::assistant::{self, CHAT_FAILED_REPLY, CHAT_OFFLINE_REPLY, Speaker};
use studymate_core::auth::{self, AuthForm, AuthMode};
use studymate_core::error::AuthError;
use studymate_core::idle::{IdleCheck, IdleTracker};
use studymate_core::session::{
    MemoryStore, SessionManager, SessionStatus, SessionStore, TOKEN_KEY,
};

const AUTH_OK: &str = r#"{"token":"jwt-1","usuario":{"id":3,"nombre":"Luis","email":"luis@example.com"}}"#;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0)
        .single()
        .expect("valid start")
}

fn credentials() -> AuthForm {
    AuthForm {
        email: "luis@example.com".to_string(),
        password: "clave".to_string(),
        ..AuthForm::default()
    }
}

#[tokio::test]
async fn login_starts_a_persisted_session() {
    let transport = RecordingTransport::default();
    transport.reply(Method::Post, "/auth/login", 200, AUTH_OK);
    let api = ApiClient::new(transport.clone(), BASE);

    let response = auth::submit(&api, AuthMode::Login, &credentials())
        .await
        .expect("login accepted");

    let mut session = SessionManager::restore(MemoryStore::new(), IdleTracker::default());
    session.begin(response, start());

    assert!(session.is_authenticated());
    assert_eq!(session.display_name(), "Luis");
    assert_eq!(session.store().load(TOKEN_KEY).as_deref(), Some("jwt-1"));
    assert_eq!(transport.sent()[0].bearer, None);
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let transport = RecordingTransport::default();
    transport.reply(
        Method::Post,
        "/auth/login",
        401,
        r#"{"message":"Credenciales inválidas"}"#,
    );
    transport.fail(Method::Post, "/auth/login");
    let api = ApiClient::new(transport.clone(), BASE);

    let err = auth::login(&api, &credentials())
        .await
        .expect_err("rejected");
    assert_eq!(err.user_message(), "Credenciales inválidas");

    let err = auth::login(&api, &credentials())
        .await
        .expect_err("offline");
    assert_eq!(err.user_message(), "Error de conexión");
}

#[tokio::test]
async fn password_mismatch_never_reaches_network() {
    let transport = RecordingTransport::default();
    let api = ApiClient::new(transport.clone(), BASE);
    let form = AuthForm {
        name: "Luis".to_string(),
        confirm: "otra".to_string(),
        ..credentials()
    };

    let err = auth::submit(&api, AuthMode::Register, &form)
        .await
        .expect_err("mismatch");

    assert_eq!(err, AuthError::PasswordMismatch);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn validation_outcomes() {
    let transport = RecordingTransport::default();
    let anonymous = ApiClient::new(transport.clone(), BASE);
    assert_eq!(
        auth::validate_session(&anonymous).await,
        SessionStatus::Missing
    );
    assert!(transport.sent().is_empty());

    transport.reply(
        Method::Get,
        "/auth/me",
        200,
        r#"{"usuario":{"id":3,"nombre":"Luis Ángel"}}"#,
    );
    let api = client(&transport);
    let status = auth::validate_session(&api).await;
    let SessionStatus::Valid(user) = &status else {
        panic!("expected valid session, got {status:?}");
    };
    assert_eq!(user.name, "Luis Ángel");

    let mut store = MemoryStore::new();
    store.save(TOKEN_KEY, "tok").expect("seed token");
    let mut session = SessionManager::restore(store, IdleTracker::default());
    assert!(session.apply_status(status, start()));
    assert_eq!(session.display_name(), "Luis Ángel");

    // No reply scripted: /auth/me answers 404 and the session is dropped.
    let status = auth::validate_session(&api).await;
    assert_eq!(status, SessionStatus::Invalid);
    assert!(!session.apply_status(status, start()));
    assert!(session.token().is_none());
    assert_eq!(transport.sent_to(Method::Get, "/auth/me").len(), 2);
}

#[test]
fn idle_gaps_under_thirty_minutes_never_log_out() {
    let mut session = SessionManager::restore(MemoryStore::new(), IdleTracker::default());
    let mut now = start();
    session.begin(
        serde_json::from_str(AUTH_OK).expect("auth response"),
        now,
    );

    let gaps = [1, 29, 15, 29, 0, 7, 29, 29, 3];
    for gap in gaps {
        now += TimeDelta::minutes(gap);
        assert!(matches!(session.check_idle(now), IdleCheck::Remaining(_)));
        session.record_activity(now);
    }
    assert!(session.is_authenticated());

    now += TimeDelta::minutes(30);
    let checks: Vec<IdleCheck> = (0..3)
        .map(|step| session.check_idle(now + TimeDelta::seconds(step)))
        .collect();
    assert_eq!(
        checks
            .iter()
            .filter(|c| **c == IdleCheck::Expired)
            .count(),
        1
    );
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn chat_reply_or_apology() {
    let transport = RecordingTransport::default();
    transport.reply(
        Method::Post,
        "/ai/chatbot",
        200,
        r#"{"respuesta":"Una derivada mide el cambio."}"#,
    );
    transport.reply(Method::Post, "/usuarios/actividad", 201, "{}");
    transport.reply(Method::Post, "/ai/chatbot", 500, "{}");
    transport.fail(Method::Post, "/ai/chatbot");
    let api = client(&transport);
    let view = RecordingView::default();

    let reply = assistant::send_chat(&api, &view, "¿Qué es una derivada?", "Chat académico").await;
    assert_eq!(reply.speaker, Speaker::Bot);
    assert_eq!(reply.text, "Una derivada mide el cambio.");
    assert_eq!(view.events(), vec!["activity"]);

    let reply = assistant::send_chat(&api, &view, "otra", "Chat académico").await;
    assert_eq!(reply.text, CHAT_FAILED_REPLY);

    let reply = assistant::send_chat(&api, &view, "otra", "Chat académico").await;
    assert_eq!(reply.text, CHAT_OFFLINE_REPLY);
    assert_eq!(transport.sent_to(Method::Post, "/usuarios/actividad").len(), 1);
}
