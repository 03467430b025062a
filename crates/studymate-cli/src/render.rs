use std::io::{self, IsTerminal, Write};

use studymate_core::activity::{EMPTY_ACTIVITY, display_time};
use studymate_core::assistant::ChatMessage;
use studymate_core::draft::due_from_wire;
use studymate_core::notify::NoticeLevel;
use studymate_core::priority::Priority;
use studymate_core::resource::{Notes, Resource, Subjects, Tasks};
use studymate_shared::{ActivityDto, NoteDto, SubjectDto, TaskDto, UserDto};
use unicode_width::UnicodeWidthStr;

use crate::config::Settings;

const PREVIEW_CHARS: usize = 48;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            color: settings.color,
        }
    }

    #[tracing::instrument(skip(self, notes))]
    pub fn print_notes(&self, notes: &[NoteDto]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if notes.is_empty() {
            writeln!(out, "{}", Notes::empty_message())?;
            return Ok(());
        }

        let rows = notes
            .iter()
            .map(|note| {
                vec![
                    self.paint(&note.id.to_string(), "33"),
                    note.title.clone(),
                    note.subject.clone().unwrap_or_default(),
                    preview(&note.content),
                ]
            })
            .collect();

        write_table(&mut out, headers(&["ID", "Title", "Subject", "Content"]), rows)
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_tasks(&self, tasks: &[TaskDto]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if tasks.is_empty() {
            writeln!(out, "{}", Tasks::empty_message())?;
            return Ok(());
        }

        let rows = tasks
            .iter()
            .map(|task| {
                let priority = self.paint(&task.priority, priority_color(&task.priority));
                let due = task.due.as_deref().map(due_from_wire).unwrap_or_default();
                let subject = task
                    .subject
                    .as_ref()
                    .map(|subject| {
                        subject
                            .name
                            .clone()
                            .unwrap_or_else(|| format!("#{}", subject.id))
                    })
                    .unwrap_or_default();
                let done = if task.completed { "x" } else { "" };

                vec![
                    self.paint(&task.id.to_string(), "33"),
                    done.to_string(),
                    task.title.clone(),
                    priority,
                    due.replace('T', " "),
                    subject,
                ]
            })
            .collect();

        write_table(
            &mut out,
            headers(&["ID", "Done", "Title", "Priority", "Due", "Subject"]),
            rows,
        )
    }

    #[tracing::instrument(skip(self, subjects))]
    pub fn print_subjects(&self, subjects: &[SubjectDto]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if subjects.is_empty() {
            writeln!(out, "{}", Subjects::empty_message())?;
            return Ok(());
        }

        let rows = subjects
            .iter()
            .map(|subject| {
                vec![
                    self.paint(&subject.id.to_string(), "33"),
                    subject.name.clone(),
                    subject.professor.clone().unwrap_or_default(),
                    subject.schedule.clone().unwrap_or_default(),
                    subject.color.clone().unwrap_or_default(),
                ]
            })
            .collect();

        write_table(
            &mut out,
            headers(&["ID", "Name", "Professor", "Schedule", "Color"]),
            rows,
        )
    }

    #[tracing::instrument(skip(self, entries))]
    pub fn print_activity(&self, entries: &[ActivityDto]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        if entries.is_empty() {
            writeln!(out, "{EMPTY_ACTIVITY}")?;
            return Ok(());
        }

        let rows = entries
            .iter()
            .map(|entry| {
                vec![
                    self.paint(&display_time(entry), "2"),
                    entry.kind.clone(),
                    entry.description.clone(),
                ]
            })
            .collect();

        write_table(&mut out, headers(&["When", "Kind", "Description"]), rows)
    }

    pub fn print_user(&self, user: &UserDto) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "id        {}", user.id)?;
        writeln!(out, "nombre    {}", user.name)?;
        if let Some(last_name) = user.last_name.as_deref() {
            writeln!(out, "apellido  {last_name}")?;
        }
        if let Some(email) = user.email.as_deref() {
            writeln!(out, "email     {email}")?;
        }
        Ok(())
    }

    pub fn print_reply(&self, message: &ChatMessage) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", message.text)?;
        Ok(())
    }

    pub fn print_text(&self, title: &str, body: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", self.paint(title, "1"))?;
        writeln!(out, "{body}")?;
        Ok(())
    }

    /// Notices go to stderr so tables on stdout stay pipeable.
    pub fn print_notice(&self, level: NoticeLevel, message: &str) {
        let tag = match level {
            NoticeLevel::Success => self.paint("ok", "32"),
            NoticeLevel::Error => self.paint("error", "31"),
            NoticeLevel::Warning => self.paint("warning", "33"),
            NoticeLevel::Info => self.paint("info", "36"),
        };
        eprintln!("{tag}: {message}");
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn priority_color(raw: &str) -> &'static str {
    match Priority::from_wire(raw) {
        Some(Priority::Low) => "32",
        Some(Priority::Medium) => "33",
        Some(Priority::High) => "31",
        Some(Priority::Urgent) => "1;31",
        None => "2",
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= PREVIEW_CHARS && !text.contains('\n') {
        return line.to_string();
    }
    let cut: String = line.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}...")
}

pub fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_by_visible_width() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            headers(&["ID", "Materia"]),
            vec![
                vec!["\x1b[33m1\x1b[0m".to_string(), "Cálculo".to_string()],
                vec!["12".to_string(), "Arte".to_string()],
            ],
        )
        .expect("table");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID Materia ");
        assert_eq!(lines[1], "-- ------- ");
        assert_eq!(strip_ansi(lines[2]), "1  Cálculo ");
        assert_eq!(lines[3], "12 Arte    ");
    }

    #[test]
    fn long_content_is_previewed() {
        assert_eq!(preview("corto"), "corto");
        assert_eq!(preview("uno\ndos"), "uno...");
        let long = "a".repeat(60);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn color_off_paints_plain_text() {
        let mut settings = Settings::default();
        settings
            .apply_overrides([("rc.color".to_string(), "off".to_string())])
            .expect("override");
        let renderer = Renderer::new(&settings);
        assert_eq!(renderer.paint("x", "31"), "x");
    }
}
