use studymate_shared::{
  ActivityCreate,
  ActivityDto
};

pub const EMPTY_ACTIVITY: &str =
  "No hay actividad reciente";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ActivityKind {
  Chat,
  Plan,
  Pdf,
  Note,
  Task,
  Subject
}

impl ActivityKind {
  pub fn as_wire(self) -> &'static str {
    match self {
      | ActivityKind::Chat => "chat",
      | ActivityKind::Plan => "plan",
      | ActivityKind::Pdf => "pdf",
      | ActivityKind::Note => "note",
      | ActivityKind::Task => "task",
      | ActivityKind::Subject => "subject"
    }
  }

  pub fn from_wire(
    raw: &str
  ) -> Option<Self> {
    match raw {
      | "chat" => Some(ActivityKind::Chat),
      | "plan" => Some(ActivityKind::Plan),
      | "pdf" => Some(ActivityKind::Pdf),
      | "note" => Some(ActivityKind::Note),
      | "task" => Some(ActivityKind::Task),
      | "subject" => {
        Some(ActivityKind::Subject)
      }
      | _ => None
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      | ActivityKind::Chat => "comments",
      | ActivityKind::Plan => {
        "calendar-alt"
      }
      | ActivityKind::Pdf => "file-pdf",
      | ActivityKind::Note => {
        "sticky-note"
      }
      | ActivityKind::Task => "tasks",
      | ActivityKind::Subject => "book"
    }
  }

  pub fn entry(
    self,
    description: impl Into<String>
  ) -> ActivityCreate {
    ActivityCreate {
      kind:        self
        .as_wire()
        .to_string(),
      description: description.into()
    }
  }
}

/// Icon for a raw `tipo`; unknown kinds
/// get a neutral info icon.
pub fn icon_for(raw: &str) -> &'static str {
  ActivityKind::from_wire(raw)
    .map(ActivityKind::icon)
    .unwrap_or("info-circle")
}

/// Display form of the server timestamp.
/// Unparseable values are shown as sent.
pub fn display_time(
  entry: &ActivityDto
) -> String {
  let Some(raw) =
    entry.created_at.as_deref()
  else {
    return String::new();
  };
  crate::draft::parse_server_datetime(raw)
    .map(|at| {
      at.format("%d/%m/%Y %H:%M")
        .to_string()
    })
    .unwrap_or_else(|| raw.to_string())
}
