use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

/// Dialogs reachable from the dashboard.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Feature {
  Chat,
  Plan,
  Summary,
  Notes,
  Tasks,
  Subjects
}

impl Feature {
  pub const ALL: [Feature; 6] = [
    Feature::Chat,
    Feature::Plan,
    Feature::Summary,
    Feature::Notes,
    Feature::Tasks,
    Feature::Subjects
  ];

  pub fn dialog_id(self) -> &'static str {
    match self {
      | Feature::Chat => "chatbot",
      | Feature::Plan => "plan-estudio",
      | Feature::Summary => "resumen-pdf",
      | Feature::Notes => "notas",
      | Feature::Tasks => "tareas",
      | Feature::Subjects => "materias"
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      | Feature::Chat => "Chatbot académico",
      | Feature::Plan => "Plan de estudio",
      | Feature::Summary => "Resumen de PDF",
      | Feature::Notes => "Mis notas",
      | Feature::Tasks => "Mis tareas",
      | Feature::Subjects => "Mis materias"
    }
  }

  fn icon(self) -> &'static str {
    match self {
      | Feature::Chat => "fas fa-robot",
      | Feature::Plan => {
        "fas fa-calendar-alt"
      }
      | Feature::Summary => {
        "fas fa-file-pdf"
      }
      | Feature::Notes => {
        "fas fa-sticky-note"
      }
      | Feature::Tasks => "fas fa-tasks",
      | Feature::Subjects => "fas fa-book"
    }
  }

  fn blurb(self) -> &'static str {
    match self {
      | Feature::Chat => {
        "Resuelve tus dudas con la IA"
      }
      | Feature::Plan => {
        "Organiza tus horas de estudio"
      }
      | Feature::Summary => {
        "Resume documentos y apuntes"
      }
      | Feature::Notes => {
        "Guarda tus apuntes por materia"
      }
      | Feature::Tasks => {
        "Controla entregas y prioridades"
      }
      | Feature::Subjects => {
        "Gestiona materias y horarios"
      }
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct FeatureCardsProps {
  pub on_open: Callback<Feature>
}

#[function_component(FeatureCards)]
pub fn feature_cards(
  props: &FeatureCardsProps
) -> Html {
  html! {
      <div class="row g-3 feature-cards">
          { for Feature::ALL.into_iter().map(|feature| {
              let on_open = props.on_open.clone();
              html! {
                  <div class="col-md-4" key={feature.dialog_id()}>
                      <div class="card h-100 feature-card" onclick={move |_| on_open.emit(feature)}>
                          <div class="card-body text-center">
                              <i class={format!("{} fa-2x mb-2", feature.icon())}></i>
                              <h5 class="card-title">{ feature.title() }</h5>
                              <p class="card-text text-muted">{ feature.blurb() }</p>
                          </div>
                      </div>
                  </div>
              }
          }) }
      </div>
  }
}
