//! Subject timetable rows and their
//! single-string transport form
//! `"Lunes 08:00-10:00, Jueves 14:00-16:00"`.

pub const WEEKDAYS: [&str; 7] = [
  "Lunes",
  "Martes",
  "Miércoles",
  "Jueves",
  "Viernes",
  "Sábado",
  "Domingo"
];

const ENTRY_SEPARATOR: &str = ", ";

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct ScheduleEntry {
  pub day:   String,
  pub start: String,
  pub end:   String
}

impl ScheduleEntry {
  pub fn new(
    day: impl Into<String>,
    start: impl Into<String>,
    end: impl Into<String>
  ) -> Self {
    Self {
      day:   day.into(),
      start: start.into(),
      end:   end.into()
    }
  }

  pub fn is_complete(&self) -> bool {
    !self.day.trim().is_empty()
      && !self.start.trim().is_empty()
      && !self.end.trim().is_empty()
  }
}

/// Joins complete rows; rows with any
/// blank field are left out. No check is
/// made that `start` precedes `end`.
pub fn format_schedule(
  entries: &[ScheduleEntry]
) -> String {
  entries
    .iter()
    .filter(|entry| entry.is_complete())
    .map(|entry| {
      format!(
        "{} {}-{}",
        entry.day.trim(),
        entry.start.trim(),
        entry.end.trim()
      )
    })
    .collect::<Vec<_>>()
    .join(ENTRY_SEPARATOR)
}

/// Inverse of [`format_schedule`].
/// Segments without a day or without a
/// full `start-end` range are skipped.
pub fn parse_schedule(
  raw: &str
) -> Vec<ScheduleEntry> {
  let mut entries = Vec::new();
  let mut skipped = 0_usize;

  for segment in raw.split(',') {
    let segment = segment.trim();
    if segment.is_empty() {
      continue;
    }

    match parse_segment(segment) {
      | Some(entry) => entries.push(entry),
      | None => skipped += 1
    }
  }

  if skipped > 0 {
    tracing::debug!(
      skipped,
      kept = entries.len(),
      "dropped malformed schedule \
       segments"
    );
  }

  entries
}

fn parse_segment(
  segment: &str
) -> Option<ScheduleEntry> {
  let mut parts =
    segment.split_whitespace();
  let day = parts.next()?;
  let range = parts.next()?;
  let (start, end) =
    range.split_once('-')?;
  let end = end
    .split('-')
    .next()
    .unwrap_or_default();

  let entry =
    ScheduleEntry::new(day, start, end);
  entry.is_complete().then_some(entry)
}

/// Editable list of schedule rows bound
/// to the subject form.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct ScheduleRows {
  rows: Vec<ScheduleEntry>
}

impl ScheduleRows {
  /// The blank state of a new subject
  /// form: a single empty row.
  pub fn blank() -> Self {
    Self {
      rows: vec![ScheduleEntry::default()]
    }
  }

  pub fn from_schedule(
    raw: Option<&str>
  ) -> Self {
    Self {
      rows: raw
        .map(parse_schedule)
        .unwrap_or_default()
    }
  }

  pub fn rows(&self) -> &[ScheduleEntry] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn add_row(&mut self) {
    self
      .rows
      .push(ScheduleEntry::default());
  }

  pub fn remove_row(
    &mut self,
    index: usize
  ) -> Option<ScheduleEntry> {
    (index < self.rows.len())
      .then(|| self.rows.remove(index))
  }

  pub fn row_mut(
    &mut self,
    index: usize
  ) -> Option<&mut ScheduleEntry> {
    self.rows.get_mut(index)
  }

  pub fn to_schedule_string(
    &self
  ) -> String {
    format_schedule(&self.rows)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn complete_rows_round_trip() {
    let rows = vec![
      ScheduleEntry::new(
        "Lunes", "08:00", "10:00"
      ),
      ScheduleEntry::new(
        "Miércoles",
        "14:30",
        "16:00"
      ),
    ];

    let raw = format_schedule(&rows);
    assert_eq!(
      raw,
      "Lunes 08:00-10:00, Miércoles \
       14:30-16:00"
    );
    assert_eq!(parse_schedule(&raw), rows);
  }

  #[test]
  fn incomplete_rows_are_not_serialized()
  {
    let rows = vec![
      ScheduleEntry::new("", "08:00", "10:00"),
      ScheduleEntry::new(
        "Viernes", "09:00", ""
      ),
      ScheduleEntry::new(
        "Sábado", "10:00", "12:00"
      ),
    ];
    assert_eq!(
      format_schedule(&rows),
      "Sábado 10:00-12:00"
    );
  }

  #[test]
  fn malformed_segments_are_dropped_silently()
  {
    let parsed = parse_schedule(
      "Lunes, Martes 08:00, Jueves \
       -10:00, Viernes 11:00-13:00,,"
    );
    assert_eq!(
      parsed,
      vec![ScheduleEntry::new(
        "Viernes", "11:00", "13:00"
      )]
    );
    assert!(parse_schedule("").is_empty());
    assert!(
      parse_schedule("   ").is_empty()
    );
  }

  #[test]
  fn rows_editor_adds_and_removes() {
    let mut rows = ScheduleRows::blank();
    assert_eq!(rows.len(), 1);

    rows.add_row();
    if let Some(row) = rows.row_mut(1) {
      *row = ScheduleEntry::new(
        "Martes", "07:00", "09:00"
      );
    }
    assert_eq!(
      rows.to_schedule_string(),
      "Martes 07:00-09:00"
    );

    assert!(rows.remove_row(5).is_none());
    let removed = rows.remove_row(0);
    assert_eq!(
      removed,
      Some(ScheduleEntry::default())
    );
    assert_eq!(rows.len(), 1);

    let loaded =
      ScheduleRows::from_schedule(Some(
        "Jueves 10:00-11:00"
      ));
    assert_eq!(loaded.len(), 1);
    assert!(
      ScheduleRows::from_schedule(None)
        .is_empty()
    );
  }
}
