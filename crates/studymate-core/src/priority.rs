use std::fmt;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High,
  Urgent
}

impl Priority {
  pub const ALL: [Priority; 4] = [
    Priority::Low,
    Priority::Medium,
    Priority::High,
    Priority::Urgent
  ];

  pub fn as_wire(self) -> &'static str {
    match self {
      | Priority::Low => "BAJA",
      | Priority::Medium => "MEDIA",
      | Priority::High => "ALTA",
      | Priority::Urgent => "URGENTE"
    }
  }

  /// Accepts the wire value in any case.
  pub fn from_wire(
    raw: &str
  ) -> Option<Self> {
    let upper =
      raw.trim().to_uppercase();
    Self::ALL
      .into_iter()
      .find(|p| p.as_wire() == upper)
  }

  pub fn label(self) -> &'static str {
    match self {
      | Priority::Low => "Baja",
      | Priority::Medium => "Media",
      | Priority::High => "Alta",
      | Priority::Urgent => "Urgente"
    }
  }

  pub fn badge(self) -> &'static str {
    match self {
      | Priority::Low => "success",
      | Priority::Medium => "warning",
      | Priority::High => "danger",
      | Priority::Urgent => "dark"
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_wire())
  }
}

/// Badge color for a raw `prioridad`
/// value as stored by the server.
pub fn badge_for(raw: &str) -> &'static str {
  match raw {
    | "BAJA" => "success",
    | "MEDIA" => "warning",
    | "ALTA" => "danger",
    | "URGENTE" => "dark",
    | _ => "secondary"
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wire_values_and_badges() {
    assert_eq!(
      Priority::default().as_wire(),
      "MEDIA"
    );
    assert_eq!(
      Priority::from_wire("urgente"),
      Some(Priority::Urgent)
    );
    assert_eq!(
      Priority::from_wire("normal"),
      None
    );
    assert_eq!(badge_for("ALTA"), "danger");
    assert_eq!(
      badge_for("alta"),
      "secondary"
    );
    for priority in Priority::ALL {
      assert_eq!(
        badge_for(priority.as_wire()),
        priority.badge()
      );
    }
  }
}
