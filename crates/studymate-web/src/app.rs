use chrono::Utc;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use studymate_core::auth::{
  LogoutReason,
  WELCOME_MESSAGE,
  validate_session
};
use studymate_core::idle::IdleTracker;
use studymate_core::notify::NoticeLevel;
use studymate_core::session::SessionManager;
use studymate_shared::{
  ActivityDto,
  AuthResponse
};
use wasm_bindgen::JsCast;
use yew::{
  Callback,
  ContextProvider,
  Html,
  MouseEvent,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_reducer,
  use_state
};

use crate::api::{
  Client,
  ClientHandle,
  FetchTransport
};
use crate::components::{
  ActivityFeed,
  AuthModal,
  ChatPanel,
  Feature,
  FeatureCards,
  LoadingOverlay,
  NotesPanel,
  PlanPanel,
  SubjectsPanel,
  SummaryPanel,
  TasksPanel,
  ToastHost
};
use crate::feedback::{
  UiFeedback,
  ui_debug
};
use crate::idle::IdleWatcher;
use crate::overlay::OverlayHub;
use crate::state::{
  UiAction,
  UiState
};
use crate::storage::{
  BrowserStore,
  load_settings,
  page_host
};

const INIT_FAILED: &str =
  "Error al inicializar la aplicación";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Gate {
  /// The stored token is being checked.
  Checking,
  SignedOut,
  SignedIn
}

#[function_component(App)]
pub fn app() -> Html {
  let settings = use_state(load_settings);
  let base_url = use_state(|| {
    settings.api_base_for_host(&page_host())
  });
  let ui = use_reducer(|| {
    UiState::new(settings.notice_board())
  });
  let session = use_mut_ref(|| {
    SessionManager::restore(
      BrowserStore,
      IdleTracker::new(settings.idle_timeout())
    )
  });
  let client = use_state(|| {
    ClientHandle::new(
      Client::new(FetchTransport, &*base_url)
        .with_token(
          session
            .borrow()
            .token()
            .map(str::to_string)
        )
    )
  });
  let gate = use_state(|| Gate::Checking);
  let user_name = use_state(String::new);
  let feature = use_state(|| None::<Feature>);
  let activity =
    use_state(Vec::<ActivityDto>::new);
  let hub = use_state(OverlayHub::default);

  let feedback = {
    let notify = ui.dispatcher();
    let loading = ui.dispatcher();
    let logged = ui.dispatcher();
    UiFeedback {
      notify:   Callback::from(
        move |(level, message): (NoticeLevel, String)| {
          notify.dispatch(UiAction::Notify(
            level,
            message,
            Utc::now()
          ))
        }
      ),
      loading:  Callback::from(move |on| {
        loading.dispatch(UiAction::Loading(on))
      }),
      activity: Callback::from(move |()| {
        logged.dispatch(UiAction::ActivityLogged)
      })
    }
  };

  let sign_out = {
    let session = session.clone();
    let client = client.clone();
    let base_url = base_url.clone();
    let gate = gate.clone();
    let feature = feature.clone();
    let activity = activity.clone();
    let ui = ui.dispatcher();
    Callback::from(move |reason: LogoutReason| {
      session.borrow_mut().end();
      client.set(ClientHandle::new(Client::new(
        FetchTransport,
        &*base_url
      )));
      feature.set(None);
      activity.set(Vec::new());
      gate.set(Gate::SignedOut);
      ui_debug("session.end", &format!("{reason:?}"));
      ui.dispatch(UiAction::Notify(
        reason.level(),
        reason.message().to_string(),
        Utc::now()
      ));
    })
  };

  {
    let session = session.clone();
    let client = client.clone();
    let base_url = base_url.clone();
    let gate = gate.clone();
    let user_name = user_name.clone();
    use_effect_with((), move |_| {
      ui_debug(
        "app.mounted",
        "validating stored session"
      );
      let checked = (*client).clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let status =
            validate_session(&*checked).await;
          let valid = session
            .borrow_mut()
            .apply_status(status, Utc::now());
          if valid {
            user_name.set(
              session.borrow().display_name()
            );
            gate.set(Gate::SignedIn);
          } else {
            client.set(ClientHandle::new(
              Client::new(
                FetchTransport,
                &*base_url
              )
            ));
            gate.set(Gate::SignedOut);
          }
        }
      );
      || ()
    });
  }

  {
    let session = session.clone();
    let sign_out = sign_out.clone();
    let ui = ui.dispatcher();
    use_effect_with(*gate, move |gate| {
      let watcher = (*gate == Gate::SignedIn)
        .then(|| {
          let watcher = IdleWatcher::start(
            session,
            Callback::from(move |()| {
              sign_out.emit(LogoutReason::Idle)
            })
          );
          if watcher.is_none() {
            ui.dispatch(UiAction::AppError(
              INIT_FAILED.to_string(),
              Utc::now()
            ));
          }
          watcher
        })
        .flatten();
      move || drop(watcher)
    });
  }

  {
    let hub = (*hub).clone();
    use_effect_with((), move |_| {
      let listener = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
          EventListener::new(
            &document,
            "keydown",
            move |event| {
              if event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .is_some_and(|key| {
                  key.key() == "Escape"
                })
              {
                hub.escape();
              }
            }
          )
        });
      move || drop(listener)
    });
  }

  {
    let ui = ui.clone();
    use_effect_with(
      ui.board.next_expiry(),
      move |next| {
        let timer = next.map(|at| {
          let wait = (at - Utc::now())
            .num_milliseconds()
            .clamp(0, i64::from(u32::MAX))
            as u32;
          let dispatcher = ui.dispatcher();
          Timeout::new(wait, move || {
            dispatcher.dispatch(
              UiAction::Expire(Utc::now())
            )
          })
        });
        move || drop(timer)
      }
    );
  }

  {
    let activity = activity.clone();
    use_effect_with(
      (*gate, ui.activity_rev, (*client).clone()),
      move |(gate, _, client)| {
        if *gate == Gate::SignedIn {
          let client = client.clone();
          wasm_bindgen_futures::spawn_local(
            async move {
              match client.activity().await {
                | Ok(entries) => {
                  activity.set(entries)
                }
                | Err(err) => {
                  tracing::warn!(
                    error = %err,
                    "failed to load activity"
                  );
                }
              }
            }
          );
        }
        || ()
      }
    );
  }

  let on_authenticated = {
    let session = session.clone();
    let client = client.clone();
    let base_url = base_url.clone();
    let gate = gate.clone();
    let user_name = user_name.clone();
    let ui = ui.dispatcher();
    Callback::from(move |auth: AuthResponse| {
      let token = auth.token.clone();
      session.borrow_mut().begin(auth, Utc::now());
      client.set(ClientHandle::new(
        Client::new(FetchTransport, &*base_url)
          .with_token(Some(token))
      ));
      user_name
        .set(session.borrow().display_name());
      gate.set(Gate::SignedIn);
      ui.dispatch(UiAction::Notify(
        NoticeLevel::Success,
        WELCOME_MESSAGE.to_string(),
        Utc::now()
      ));
    })
  };

  let on_open = {
    let feature = feature.clone();
    Callback::from(move |picked: Feature| {
      ui_debug("feature.open", picked.dialog_id());
      feature.set(Some(picked));
    })
  };
  let on_close = {
    let feature = feature.clone();
    Callback::from(move |()| feature.set(None))
  };
  let on_logout = {
    let sign_out = sign_out.clone();
    Callback::from(move |_: MouseEvent| {
      sign_out.emit(LogoutReason::User)
    })
  };
  let on_dismiss = {
    let ui = ui.dispatcher();
    Callback::from(move |id| {
      ui.dispatch(UiAction::Dismiss(id))
    })
  };
  let on_subject_saved = {
    let ui = ui.dispatcher();
    Callback::from(move |()| {
      ui.dispatch(UiAction::SubjectsSaved)
    })
  };

  let open = |which: Feature| {
    *feature == Some(which)
  };
  let signed_in = *gate == Gate::SignedIn;

  html! {
      <ContextProvider<OverlayHub> context={(*hub).clone()}>
          <nav class="navbar navbar-dark bg-primary mb-4">
              <div class="container">
                  <span class="navbar-brand"><i class="fas fa-graduation-cap me-2"></i>{ "StudyMate IA" }</span>
                  if signed_in {
                      <div class="d-flex align-items-center text-white gap-3">
                          <span><i class="fas fa-user-circle me-1"></i>{ (*user_name).clone() }</span>
                          <button class="btn btn-outline-light btn-sm" onclick={on_logout}>
                              <i class="fas fa-sign-out-alt me-1"></i>{ "Cerrar sesión" }
                          </button>
                      </div>
                  }
              </div>
          </nav>
          if signed_in {
              <main class="container">
                  <FeatureCards on_open={on_open} />
                  <div class="mt-4">
                      <ActivityFeed entries={(*activity).clone()} />
                  </div>
                  <ChatPanel open={open(Feature::Chat)} on_close={on_close.clone()} client={(*client).clone()} feedback={feedback.clone()} context={settings.chat_context.clone()} />
                  <PlanPanel open={open(Feature::Plan)} on_close={on_close.clone()} client={(*client).clone()} feedback={feedback.clone()} />
                  <SummaryPanel open={open(Feature::Summary)} on_close={on_close.clone()} client={(*client).clone()} feedback={feedback.clone()} />
                  <NotesPanel open={open(Feature::Notes)} on_close={on_close.clone()} client={(*client).clone()} feedback={feedback.clone()} subjects_tick={ui.subjects_rev} />
                  <TasksPanel open={open(Feature::Tasks)} on_close={on_close.clone()} client={(*client).clone()} feedback={feedback.clone()} subjects_tick={ui.subjects_rev} />
                  <SubjectsPanel open={open(Feature::Subjects)} on_close={on_close} client={(*client).clone()} feedback={feedback.clone()} on_saved={on_subject_saved} />
              </main>
          }
          <AuthModal open={*gate == Gate::SignedOut} client={(*client).clone()} feedback={feedback} on_authenticated={on_authenticated} />
          <ToastHost notices={ui.board.notices().to_vec()} on_dismiss={on_dismiss} />
          <LoadingOverlay active={ui.is_loading() || *gate == Gate::Checking} />
      </ContextProvider<OverlayHub>>
  }
}
