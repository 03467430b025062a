use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, anyhow, bail};
use chrono::Utc;
use studymate_core::api::{ApiClient, FileUpload, Transport};
use studymate_core::assistant::{
    self, ChatTranscript, PlanForm, SUMMARY_FILE_FIELD, SummarySource,
};
use studymate_core::auth::{self, AuthForm, AuthMode, LogoutReason, WELCOME_MESSAGE};
use studymate_core::draft::{
    EntityDraft, FormMode, NoteDraft, SubjectDraft, TaskDraft, parse_subject_choice,
};
use studymate_core::idle::IdleTracker;
use studymate_core::notify::NoticeLevel;
use studymate_core::priority::Priority;
use studymate_core::resource::{Notes, Resource, Subjects, Tasks};
use studymate_core::schedule::ScheduleRows;
use studymate_core::session::{SessionManager, SessionStatus, SessionStore};
use studymate_core::workflow::{self, EntityView, Feedback, Outcome};
use studymate_shared::{NoteDto, RecordId, SubjectDto, TaskDto};
use tracing::{debug, info, instrument, warn};

use crate::cli::{
    Command, NoteFields, NotesCommand, SubjectFields, SubjectsCommand, TaskFields, TasksCommand,
};
use crate::config::Settings;
use crate::render::Renderer;

/// Terminal side of the workflow hooks: notices on stderr, records as
/// tables on stdout, confirmations on stdin.
pub struct TerminalView<'a> {
    renderer: &'a Renderer,
    assume_yes: bool,
}

impl<'a> TerminalView<'a> {
    pub fn new(renderer: &'a Renderer, assume_yes: bool) -> Self {
        Self {
            renderer,
            assume_yes,
        }
    }

    fn report<T>(&self, printed: anyhow::Result<T>) {
        if let Err(err) = printed {
            warn!(error = %err, "failed writing output");
        }
    }
}

impl Feedback for TerminalView<'_> {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.renderer.print_notice(level, message);
    }

    fn loading(&self, active: bool) {
        debug!(active, "request in flight");
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        ask_yes_no(prompt, io::stdin().lock(), io::stderr())
    }

    fn activity_logged(&self) {
        debug!("activity recorded");
    }
}

impl EntityView<Notes> for TerminalView<'_> {
    fn close_form(&self) {}

    fn show_records(&self, records: Vec<NoteDto>) {
        self.report(self.renderer.print_notes(&records));
    }
}

impl EntityView<Tasks> for TerminalView<'_> {
    fn close_form(&self) {}

    fn show_records(&self, records: Vec<TaskDto>) {
        self.report(self.renderer.print_tasks(&records));
    }
}

impl EntityView<Subjects> for TerminalView<'_> {
    fn close_form(&self) {}

    fn show_records(&self, records: Vec<SubjectDto>) {
        self.report(self.renderer.print_subjects(&records));
    }
}

/// Reads one answer; anything other than y/yes (any case) declines.
pub fn ask_yes_no<R: BufRead, W: Write>(prompt: &str, mut input: R, mut output: W) -> bool {
    if write!(output, "{prompt} (yes/no) ")
        .and_then(|_| output.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[instrument(skip_all)]
pub async fn dispatch<S, T>(
    store: S,
    settings: &Settings,
    renderer: &Renderer,
    transport: T,
    command: Command,
) -> anyhow::Result<()>
where
    S: SessionStore,
    T: Transport,
{
    let mut session = SessionManager::restore(store, IdleTracker::default());
    let client = ApiClient::new(transport, settings.api_url.as_str())
        .with_token(session.token().map(str::to_string));
    info!(base_url = client.base_url(), "api client ready");

    match command {
        Command::Login { email, password } => {
            let form = AuthForm {
                email,
                password,
                ..AuthForm::default()
            };
            cmd_authenticate(&mut session, &client, renderer, AuthMode::Login, &form).await
        }
        Command::Register {
            nombre,
            apellido,
            email,
            password,
            confirm,
        } => {
            let form = AuthForm {
                name: nombre,
                last_name: apellido,
                email,
                password,
                confirm,
            };
            cmd_authenticate(&mut session, &client, renderer, AuthMode::Register, &form).await
        }
        Command::Logout => {
            session.end();
            renderer.print_notice(LogoutReason::User.level(), LogoutReason::User.message());
            Ok(())
        }
        Command::Whoami => {
            require_session(&mut session, &client).await?;
            match session.current_user() {
                Some(user) => renderer.print_user(user),
                None => bail!("session has no user profile"),
            }
        }
        Command::Notes(cmd) => {
            require_session(&mut session, &client).await?;
            cmd_notes(&client, settings, renderer, cmd).await
        }
        Command::Tasks(cmd) => {
            require_session(&mut session, &client).await?;
            cmd_tasks(&client, settings, renderer, cmd).await
        }
        Command::Subjects(cmd) => {
            require_session(&mut session, &client).await?;
            cmd_subjects(&client, settings, renderer, cmd).await
        }
        Command::Chat { question } => {
            require_session(&mut session, &client).await?;
            cmd_chat(&client, settings, renderer, &question.join(" ")).await
        }
        Command::Plan { subjects, hours } => {
            require_session(&mut session, &client).await?;
            let view = TerminalView::new(renderer, false);
            let form = PlanForm { subjects, hours };
            let Some(plan) = assistant::generate_plan(&client, &view, &form).await else {
                bail!("study plan was not generated");
            };
            renderer.print_text("Plan de estudio", &plan)
        }
        Command::Summarize { file, text } => {
            require_session(&mut session, &client).await?;
            cmd_summarize(&client, renderer, file.as_deref(), &text.join(" ")).await
        }
        Command::Activity => {
            require_session(&mut session, &client).await?;
            let entries = client
                .activity()
                .await
                .map_err(|err| anyhow!("failed to load activity: {err}"))?;
            renderer.print_activity(&entries)
        }
    }
}

/// Validates the stored token with the server. A rejected token is cleared
/// from the session file.
async fn require_session<S, T>(
    session: &mut SessionManager<S>,
    client: &ApiClient<T>,
) -> anyhow::Result<()>
where
    S: SessionStore,
    T: Transport,
{
    let status = auth::validate_session(client).await;
    let missing = status == SessionStatus::Missing;
    if session.apply_status(status, Utc::now()) {
        return Ok(());
    }

    if missing {
        bail!("not logged in; run `studymate login` first");
    }
    bail!("session is no longer valid; log in again")
}

#[instrument(skip(session, client, renderer, form))]
async fn cmd_authenticate<S, T>(
    session: &mut SessionManager<S>,
    client: &ApiClient<T>,
    renderer: &Renderer,
    mode: AuthMode,
    form: &AuthForm,
) -> anyhow::Result<()>
where
    S: SessionStore,
    T: Transport,
{
    info!("command {}", mode.title());

    let response = match auth::submit(client, mode, form).await {
        Ok(response) => response,
        Err(err) => {
            let message = err.user_message();
            renderer.print_notice(NoticeLevel::Error, &message);
            bail!("{message}");
        }
    };

    session.begin(response, Utc::now());
    renderer.print_notice(NoticeLevel::Success, WELCOME_MESSAGE);
    println!("{}", session.display_name());
    Ok(())
}

fn finish(outcome: Outcome, what: &str) -> anyhow::Result<()> {
    match outcome {
        Outcome::Done { activity_logged } => {
            debug!(activity_logged, "{what} finished");
            Ok(())
        }
        Outcome::Cancelled => {
            info!("{what} cancelled");
            Ok(())
        }
        Outcome::Invalid | Outcome::Failed => bail!("{what} did not complete"),
    }
}

fn wants_prompt(settings: &Settings, yes: bool) -> bool {
    !yes && settings.confirm_deletes
}

async fn list_collection<R, T, V>(client: &ApiClient<T>, view: &V) -> anyhow::Result<()>
where
    R: Resource,
    T: Transport,
    V: EntityView<R>,
{
    if !workflow::load::<R, _, _>(client, view).await {
        bail!("failed to load {}", R::COLLECTION);
    }
    Ok(())
}

async fn edit_draft<D, T, V>(client: &ApiClient<T>, view: &V, id: RecordId) -> anyhow::Result<D>
where
    D: EntityDraft,
    T: Transport,
    V: Feedback,
{
    workflow::open_edit::<D, _, _>(client, view, id)
        .await
        .ok_or_else(|| anyhow!("failed to load {} {id}", <D::Resource as Resource>::NOUN))
}

#[instrument(skip(client, settings, renderer))]
async fn cmd_notes<T: Transport>(
    client: &ApiClient<T>,
    settings: &Settings,
    renderer: &Renderer,
    cmd: NotesCommand,
) -> anyhow::Result<()> {
    match cmd {
        NotesCommand::List => {
            let view = TerminalView::new(renderer, true);
            list_collection::<Notes, _, _>(client, &view).await
        }
        NotesCommand::Add(fields) => {
            let view = TerminalView::new(renderer, true);
            let draft = apply_note_fields(NoteDraft::default(), fields);
            let outcome = workflow::submit(client, &view, &draft, FormMode::Create).await;
            finish(outcome, "note create")
        }
        NotesCommand::Edit { id, fields } => {
            let view = TerminalView::new(renderer, true);
            let draft: NoteDraft = edit_draft(client, &view, id).await?;
            let draft = apply_note_fields(draft, fields);
            let outcome = workflow::submit(client, &view, &draft, FormMode::Edit(id)).await;
            finish(outcome, "note update")
        }
        NotesCommand::Rm { id, yes } => {
            let view = TerminalView::new(renderer, !wants_prompt(settings, yes));
            let outcome = workflow::delete::<Notes, _, _>(client, &view, id).await;
            finish(outcome, "note delete")
        }
    }
}

#[instrument(skip(client, settings, renderer))]
async fn cmd_tasks<T: Transport>(
    client: &ApiClient<T>,
    settings: &Settings,
    renderer: &Renderer,
    cmd: TasksCommand,
) -> anyhow::Result<()> {
    match cmd {
        TasksCommand::List => {
            let view = TerminalView::new(renderer, true);
            list_collection::<Tasks, _, _>(client, &view).await
        }
        TasksCommand::Add(fields) => {
            let view = TerminalView::new(renderer, true);
            let draft = apply_task_fields(TaskDraft::default(), fields)?;
            let outcome = workflow::submit(client, &view, &draft, FormMode::Create).await;
            finish(outcome, "task create")
        }
        TasksCommand::Edit { id, fields } => {
            let view = TerminalView::new(renderer, true);
            let draft: TaskDraft = edit_draft(client, &view, id).await?;
            let draft = apply_task_fields(draft, fields)?;
            let outcome = workflow::submit(client, &view, &draft, FormMode::Edit(id)).await;
            finish(outcome, "task update")
        }
        TasksCommand::Done { id } => {
            let view = TerminalView::new(renderer, true);
            let outcome = workflow::complete_task(client, &view, id).await;
            finish(outcome, "task completion")
        }
        TasksCommand::Rm { id, yes } => {
            let view = TerminalView::new(renderer, !wants_prompt(settings, yes));
            let outcome = workflow::delete::<Tasks, _, _>(client, &view, id).await;
            finish(outcome, "task delete")
        }
    }
}

#[instrument(skip(client, settings, renderer))]
async fn cmd_subjects<T: Transport>(
    client: &ApiClient<T>,
    settings: &Settings,
    renderer: &Renderer,
    cmd: SubjectsCommand,
) -> anyhow::Result<()> {
    match cmd {
        SubjectsCommand::List => {
            let view = TerminalView::new(renderer, true);
            list_collection::<Subjects, _, _>(client, &view).await
        }
        SubjectsCommand::Add(fields) => {
            let view = TerminalView::new(renderer, true);
            let draft = apply_subject_fields(SubjectDraft::default(), fields);
            let outcome = workflow::submit(client, &view, &draft, FormMode::Create).await;
            finish(outcome, "subject create")
        }
        SubjectsCommand::Edit { id, fields } => {
            let view = TerminalView::new(renderer, true);
            let draft: SubjectDraft = edit_draft(client, &view, id).await?;
            let draft = apply_subject_fields(draft, fields);
            let outcome = workflow::submit(client, &view, &draft, FormMode::Edit(id)).await;
            finish(outcome, "subject update")
        }
        SubjectsCommand::Rm { id, yes } => {
            let view = TerminalView::new(renderer, !wants_prompt(settings, yes));
            let outcome = workflow::delete::<Subjects, _, _>(client, &view, id).await;
            finish(outcome, "subject delete")
        }
    }
}

#[instrument(skip(client, settings, renderer, raw))]
async fn cmd_chat<T: Transport>(
    client: &ApiClient<T>,
    settings: &Settings,
    renderer: &Renderer,
    raw: &str,
) -> anyhow::Result<()> {
    let view = TerminalView::new(renderer, true);
    let mut transcript = ChatTranscript::default();
    let Some(question) = transcript.ask(raw) else {
        bail!("question is empty");
    };

    let reply = assistant::send_chat(client, &view, &question, &settings.chat_context).await;
    renderer.print_reply(&reply)?;
    transcript.answer(reply);
    Ok(())
}

#[instrument(skip(client, renderer, text))]
async fn cmd_summarize<T: Transport>(
    client: &ApiClient<T>,
    renderer: &Renderer,
    file: Option<&Path>,
    text: &str,
) -> anyhow::Result<()> {
    let view = TerminalView::new(renderer, true);
    let upload = file.map(read_upload).transpose()?;

    let source = match SummarySource::pick(upload, text) {
        Ok(source) => source,
        Err(err) => {
            view.notify(NoticeLevel::Error, &err.message);
            bail!("nothing to summarize");
        }
    };

    let Some(summary) = assistant::summarize(client, &view, source).await else {
        bail!("summary was not generated");
    };
    renderer.print_text("Resumen", &summary)
}

pub fn read_upload(path: &Path) -> anyhow::Result<FileUpload> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    Ok(FileUpload {
        field: SUMMARY_FILE_FIELD.to_string(),
        file_name,
        mime: is_pdf.then(|| "application/pdf".to_string()),
        bytes,
    })
}

pub fn apply_note_fields(mut draft: NoteDraft, fields: NoteFields) -> NoteDraft {
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(content) = fields.content {
        draft.content = content;
    }
    if let Some(subject) = fields.subject {
        draft.subject = subject;
    }
    draft
}

pub fn apply_task_fields(mut draft: TaskDraft, fields: TaskFields) -> anyhow::Result<TaskDraft> {
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(raw) = fields.priority {
        draft.priority =
            Priority::from_wire(&raw).ok_or_else(|| anyhow!("unknown priority: {raw}"))?;
    }
    if let Some(due) = fields.due {
        draft.due = due;
    }
    if let Some(raw) = fields.subject {
        draft.subject_id = parse_subject_choice(&raw);
    }
    Ok(draft)
}

pub fn apply_subject_fields(mut draft: SubjectDraft, fields: SubjectFields) -> SubjectDraft {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(professor) = fields.professor {
        draft.professor = professor;
    }
    if let Some(color) = fields.color {
        draft.color = color;
    }
    if !fields.schedule.is_empty() {
        draft.schedule = ScheduleRows::from_schedule(Some(&fields.schedule.join(", ")));
    }
    draft
}
