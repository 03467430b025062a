mod common;

use common::{RecordingTransport, RecordingView, client};
use studymate_core::api::{Method, RequestBody};
use studymate_core::draft::{FormMode, NoteDraft, SubjectDraft, TaskDraft};
use studymate_core::notify::NoticeLevel;
use studymate_core::resource::{Notes, Tasks};
use studymate_core::workflow::{self, Outcome};

const TWO_TASKS: &str = r#"{"tareas":[
    {"id":1,"titulo":"Leer","prioridad":"BAJA"},
    {"id":2,"titulo":"Parcial","prioridad":"ALTA"}
]}"#;
const ONE_TASK: &str = r#"{"tareas":[{"id":1,"titulo":"Leer","prioridad":"BAJA"}]}"#;

fn note() -> NoteDraft {
    NoteDraft {
        title: "Derivadas".to_string(),
        content: "Regla de la cadena".to_string(),
        subject: "Cálculo".to_string(),
    }
}

#[tokio::test]
async fn create_posts_to_collection_and_edit_puts_to_item() {
    let transport = RecordingTransport::default();
    transport.reply(Method::Post, "/notas", 201, "{}");
    transport.reply(Method::Put, "/notas/4", 200, "{}");
    let api = client(&transport);
    let view = RecordingView::default();

    let created = workflow::submit(&api, &view, &note(), FormMode::Create).await;
    let edited = workflow::submit(&api, &view, &note(), FormMode::Edit(4)).await;

    assert!(created.is_done());
    assert!(edited.is_done());
    assert_eq!(transport.sent_to(Method::Post, "/notas").len(), 1);

    let put = transport.sent_to(Method::Put, "/notas/4");
    assert_eq!(put.len(), 1);
    assert_eq!(put[0].bearer.as_deref(), Some("tok"));
    let RequestBody::Json(body) = &put[0].body else {
        panic!("expected json body, got {:?}", put[0].body);
    };
    let value: serde_json::Value = serde_json::from_str(body).expect("json body");
    assert_eq!(value["titulo"], "Derivadas");
    assert_eq!(value["materia"], "Cálculo");

    let notices = view.notices.borrow();
    assert_eq!(notices[0].1, "Nota creada exitosamente");
    assert!(
        notices
            .iter()
            .any(|(_, message)| message == "Nota actualizada exitosamente")
    );
}

#[tokio::test]
async fn blank_task_title_sends_nothing_and_keeps_form_open() {
    let transport = RecordingTransport::default();
    let api = client(&transport);
    let view = RecordingView::default();

    let draft = TaskDraft {
        description: "sin título".to_string(),
        ..TaskDraft::default()
    };
    let outcome = workflow::submit(&api, &view, &draft, FormMode::Create).await;

    assert_eq!(outcome, Outcome::Invalid);
    assert!(transport.sent().is_empty());
    assert_eq!(
        view.last_notice(),
        Some((
            NoticeLevel::Error,
            "El título de la tarea es obligatorio".to_string()
        ))
    );
    assert!(!view.events().contains(&"close".to_string()));
}

#[tokio::test]
async fn confirmed_delete_reloads_and_logs_once() {
    let transport = RecordingTransport::default();
    transport.reply(Method::Delete, "/tareas/2", 200, "");
    transport.reply(Method::Get, "/tareas", 200, ONE_TASK);
    transport.reply(Method::Post, "/usuarios/actividad", 201, "{}");
    let api = client(&transport);
    let view = RecordingView::default();

    let outcome = workflow::delete::<Tasks, _, _>(&api, &view, 2).await;

    assert_eq!(
        outcome,
        Outcome::Done {
            activity_logged: true
        }
    );
    assert_eq!(transport.sent_to(Method::Delete, "/tareas/2").len(), 1);
    assert_eq!(*view.shown.borrow(), vec![1]);

    let activity = transport.sent_to(Method::Post, "/usuarios/actividad");
    assert_eq!(activity.len(), 1);
    let RequestBody::Json(body) = &activity[0].body else {
        panic!("expected json activity body");
    };
    let value: serde_json::Value = serde_json::from_str(body).expect("json body");
    assert_eq!(value["tipo"], "task");
    assert_eq!(value["descripcion"], "Tarea eliminada");

    assert_eq!(
        view.events(),
        vec![
            "confirm",
            "loading:true",
            "loading:false",
            "notify:success",
            "close",
            "show:1",
            "activity",
        ]
    );
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let transport = RecordingTransport::default();
    let api = client(&transport);
    let view = RecordingView::default();
    view.decline.set(true);

    let outcome = workflow::delete::<Notes, _, _>(&api, &view, 3).await;

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn failures_use_server_reason_or_connection_error() {
    let transport = RecordingTransport::default();
    transport.reply(
        Method::Post,
        "/materias",
        400,
        r#"{"error":"La materia ya existe"}"#,
    );
    transport.fail(Method::Post, "/materias");
    let api = client(&transport);
    let view = RecordingView::default();
    let draft = SubjectDraft {
        name: "Historia".to_string(),
        ..SubjectDraft::default()
    };

    let rejected = workflow::submit(&api, &view, &draft, FormMode::Create).await;
    assert_eq!(rejected, Outcome::Failed);
    assert_eq!(
        view.last_notice().map(|(_, m)| m).as_deref(),
        Some("La materia ya existe")
    );

    let offline = workflow::submit(&api, &view, &draft, FormMode::Create).await;
    assert_eq!(offline, Outcome::Failed);
    assert_eq!(
        view.last_notice().map(|(_, m)| m).as_deref(),
        Some("Error de conexión")
    );

    assert!(!view.events().contains(&"close".to_string()));
    assert_eq!(
        view.events()
            .iter()
            .filter(|e| e.starts_with("loading"))
            .count(),
        4
    );
}

#[tokio::test]
async fn bare_rejection_falls_back_to_generic_message() {
    let transport = RecordingTransport::default();
    transport.reply(Method::Put, "/tareas/9", 500, "<html>oops</html>");
    let api = client(&transport);
    let view = RecordingView::default();
    let draft = TaskDraft {
        title: "Ensayo".to_string(),
        ..TaskDraft::default()
    };

    workflow::submit(&api, &view, &draft, FormMode::Edit(9)).await;

    assert_eq!(
        view.last_notice().map(|(_, m)| m).as_deref(),
        Some("Error al procesar tarea")
    );
}

#[tokio::test]
async fn edit_prefills_draft_from_fetched_record() {
    let transport = RecordingTransport::default();
    transport.reply(
        Method::Get,
        "/materias/5",
        200,
        r##"{"id":5,"nombre":"Arte","horario":"Lunes 08:00-09:00, Martes","color":"#ff0000","activa":true}"##,
    );
    let api = client(&transport);
    let view = RecordingView::default();

    let draft: SubjectDraft = workflow::open_edit(&api, &view, 5)
        .await
        .expect("draft for subject 5");
    assert_eq!(draft.name, "Arte");
    assert_eq!(draft.color, "#ff0000");
    assert_eq!(draft.schedule.len(), 1);

    let missing: Option<SubjectDraft> = workflow::open_edit(&api, &view, 6).await;
    assert!(missing.is_none());
    assert_eq!(
        view.last_notice().map(|(_, m)| m).as_deref(),
        Some("Error al cargar la materia")
    );
}

#[tokio::test]
async fn complete_task_patches_and_logs() {
    let transport = RecordingTransport::default();
    transport.reply(Method::Patch, "/tareas/1/completar", 200, "{}");
    transport.reply(Method::Get, "/tareas", 200, TWO_TASKS);
    let api = client(&transport);
    let view = RecordingView::default();

    let outcome = workflow::complete_task(&api, &view, 1).await;

    // Activity endpoint was not scripted, so the log call fails quietly.
    assert_eq!(
        outcome,
        Outcome::Done {
            activity_logged: false
        }
    );
    assert_eq!(
        view.notices.borrow()[0].1,
        "Tarea marcada como completada"
    );
    assert_eq!(*view.shown.borrow(), vec![2]);
}

#[tokio::test]
async fn list_without_envelope_key_is_empty() {
    let transport = RecordingTransport::default();
    transport.reply(Method::Get, "/notas", 200, "{}");
    let api = client(&transport);
    let view = RecordingView::default();

    assert!(workflow::load::<Notes, _, _>(&api, &view).await);
    assert_eq!(*view.shown.borrow(), vec![0]);

    // Unscripted second load answers 404: list left untouched.
    assert!(!workflow::load::<Notes, _, _>(&api, &view).await);
    assert_eq!(view.shown.borrow().len(), 1);
}
