use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use studymate_shared::RecordId;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "studymate",
    version,
    about = "StudyMate: notes, tasks, subjects and the study assistant from a terminal",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "studymaterc")]
    pub studymaterc: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        nombre: String,
        #[arg(long, default_value = "")]
        apellido: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Forget the stored session
    Logout,
    /// Check the stored session against the server
    Whoami,
    #[command(subcommand)]
    Notes(NotesCommand),
    #[command(subcommand)]
    Tasks(TasksCommand),
    #[command(subcommand)]
    Subjects(SubjectsCommand),
    /// Ask the study assistant a question
    Chat {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Generate a study plan
    Plan {
        /// Comma separated subject names
        #[arg(long)]
        subjects: String,
        #[arg(long)]
        hours: String,
    },
    /// Summarize a PDF file or pasted text
    Summarize {
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },
    /// Show recent activity
    Activity,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NoteFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Subject name
    #[arg(long)]
    pub subject: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NotesCommand {
    List,
    Add(NoteFields),
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: NoteFields,
    },
    Rm {
        id: RecordId,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// BAJA, MEDIA, ALTA or URGENTE
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date as YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub due: Option<String>,
    /// Subject id; empty clears it
    #[arg(long)]
    pub subject: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TasksCommand {
    List,
    Add(TaskFields),
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: TaskFields,
    },
    Done {
        id: RecordId,
    },
    Rm {
        id: RecordId,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SubjectFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub professor: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    /// Timetable row as "Day HH:MM-HH:MM"; repeat for more rows
    #[arg(long = "schedule", action = ArgAction::Append)]
    pub schedule: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubjectsCommand {
    List,
    Add(SubjectFields),
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: SubjectFields,
    },
    Rm {
        id: RecordId,
        #[arg(long)]
        yes: bool,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls positional `rc.KEY=VALUE` (or `rc.KEY:VALUE`) overrides out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = rest
                .split_once('=')
                .or_else(|| rest.split_once(':'))
                .map(|(k, v)| (k.to_string(), v.to_string()));

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}
