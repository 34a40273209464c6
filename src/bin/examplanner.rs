//! Command-line front end for the exam planner store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use examplanner_core::export::{to_json, to_printable_html, StudentBuildGenerator};
use examplanner_core::model::status::{days_until, is_soon, today_local, ExamFilter, ExamStatus};
use examplanner_core::model::{AppConfigPatch, ExamDraft};
use examplanner_core::security::filename::{make_filename, PREFIX_CALENDAR, PREFIX_STUDENT};
use examplanner_core::{
    extract_injected_data, init_logger, parse_import, FileStore, PlannerStore, RuntimeEnv,
};

#[derive(Parser)]
#[command(name = "examplanner", version, about = "Plan exams, import/export calendars, build student copies")]
struct Cli {
    /// Data directory (defaults to $PLANNER_DATA_DIR, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Open a student build read-only instead of local storage
    #[arg(long, global = true, value_name = "HTML")]
    from_build: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List exams sorted by date
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Show total / upcoming / today counters
    Stats,
    /// Add a new exam
    Add(ExamArgs),
    /// Replace an existing exam (fields not given keep their value)
    Edit {
        id: String,
        #[command(flatten)]
        fields: ExamArgs,
    },
    /// Delete an exam
    Remove { id: String },
    /// Replace all exams from a JSON file (bare array or envelope)
    Import { file: PathBuf },
    /// Write an export file
    Export(ExportArgs),
    /// Show or change the display configuration
    Config(ConfigArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Upcoming,
    Today,
}

impl From<FilterArg> for ExamFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => ExamFilter::All,
            FilterArg::Upcoming => ExamFilter::Upcoming,
            FilterArg::Today => ExamFilter::Today,
        }
    }
}

#[derive(Args, Default)]
struct ExamArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Comma separated
    #[arg(long)]
    topics: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    form_url: Option<String>,
    #[arg(long)]
    distribution_url: Option<String>,
}

impl ExamArgs {
    fn overlay(self, mut draft: ExamDraft) -> ExamDraft {
        let pairs = [
            (self.title, &mut draft.title),
            (self.subject, &mut draft.subject),
            (self.date, &mut draft.date),
            (self.time, &mut draft.time),
            (self.location, &mut draft.location),
            (self.topics, &mut draft.topics),
            (self.notes, &mut draft.notes),
            (self.form_url, &mut draft.form_url),
            (self.distribution_url, &mut draft.distribution_url),
        ];
        for (value, slot) in pairs {
            if let Some(v) = value {
                *slot = v;
            }
        }
        draft
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Html,
    Student,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(value_enum)]
    format: ExportFormat,

    /// Output file (defaults to a dated name in the current directory)
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// JSON only: write the versioned envelope including the config
    #[arg(long)]
    with_config: bool,

    /// Student only: the bundled single-file app to snapshot
    #[arg(long, value_name = "HTML")]
    template: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long)]
    title_name: Option<String>,
    #[arg(long)]
    subtitle_name: Option<String>,
    #[arg(long)]
    semester: Option<String>,
    #[arg(long)]
    footer_text: Option<String>,
    /// Restore the defaults
    #[arg(long, conflicts_with_all = ["title_name", "subtitle_name", "semester", "footer_text"])]
    reset: bool,
}

fn main() {
    init_logger();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let env = RuntimeEnv::from_env();
    let mut store = open_store(&cli, &env)?;
    let today = today_local();

    match cli.command {
        Command::List { filter } => {
            let mut exams = store.filtered(filter.into(), today);
            exams.sort_by(|a, b| a.date.cmp(&b.date));
            if exams.is_empty() {
                println!("No hay exámenes para mostrar.");
            }
            for exam in exams {
                let status = ExamStatus::derive(exam, today);
                let soon = if is_soon(exam, today) {
                    days_until(exam, today)
                        .map(|d| format!(" (en {} días)", d))
                        .unwrap_or_default()
                } else {
                    String::new()
                };
                println!(
                    "{}  {:<9} {} - {} [{}] {}{}",
                    exam.date,
                    status.as_str(),
                    exam.subject,
                    exam.title,
                    exam.location,
                    exam.id,
                    soon
                );
            }
        }
        Command::Stats => {
            let stats = store.stats(today);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Add(fields) => {
            let record = fields.overlay(ExamDraft::default()).into_record(None)?;
            let id = record.id.clone();
            store.add(record)?;
            println!("{}", id);
        }
        Command::Edit { id, fields } => {
            let existing = store
                .get(&id)
                .with_context(|| format!("no exam with id {}", id))?;
            let record = fields
                .overlay(ExamDraft::from_record(existing))
                .into_record(Some(id.as_str()))?;
            store.update(record)?;
        }
        Command::Remove { id } => {
            let removed = store.remove(&id)?;
            println!("removed {} ({})", removed.id, removed.title);
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let result = parse_import(&text);
            println!("{}", result.message);
            for issue in &result.issues {
                println!("  {}", issue);
            }
            if !result.success {
                bail!("import failed");
            }
            store.apply_import(result)?;
        }
        Command::Export(args) => export(&store, &env, args)?,
        Command::Config(args) => {
            if args.reset {
                store.reset_config()?;
            } else {
                let patch = AppConfigPatch {
                    title_name: args.title_name,
                    subtitle_name: args.subtitle_name,
                    semester: args.semester,
                    footer_text: args.footer_text,
                };
                if !patch.is_empty() {
                    store.update_config(patch)?;
                }
            }
            println!("{}", serde_json::to_string_pretty(store.config())?);
        }
    }
    Ok(())
}

fn open_store(cli: &Cli, env: &RuntimeEnv) -> Result<PlannerStore<FileStore>> {
    let dir = cli
        .data_dir
        .clone()
        .or_else(|| env.data_dir.clone())
        .unwrap_or_else(FileStore::default_dir);
    let kv = FileStore::open(&dir).with_context(|| format!("opening data dir {}", dir.display()))?;

    let injected = match &cli.from_build {
        Some(path) => {
            let html = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let data = extract_injected_data(&html)
                .with_context(|| format!("{} carries no valid injected data", path.display()))?;
            Some(data)
        }
        None => None,
    };

    Ok(PlannerStore::open(kv, injected, env)?)
}

fn export(store: &PlannerStore<FileStore>, env: &RuntimeEnv, args: ExportArgs) -> Result<()> {
    let subtitle = store.config().subtitle_name.as_str();
    let (content, default_name) = match args.format {
        ExportFormat::Json => {
            let config = args.with_config.then(|| store.config());
            (
                to_json(store.exams(), config)?,
                make_filename(subtitle, PREFIX_CALENDAR, "json"),
            )
        }
        ExportFormat::Html => {
            let mut sorted = store.exams().to_vec();
            sorted.sort_by(|a, b| a.date.cmp(&b.date));
            (
                to_printable_html(&sorted),
                make_filename(subtitle, PREFIX_CALENDAR, "html"),
            )
        }
        ExportFormat::Student => {
            let template_path = args
                .template
                .as_deref()
                .context("--template is required for student builds")?;
            let template = read_template(template_path)?;
            let profile = env.profile_for(&template);
            let html = StudentBuildGenerator::new(template, profile)
                .generate(store.exams(), Some(store.config()))
                .context("the template must be the bundled production build (single-file)")?;
            (html, make_filename(subtitle, PREFIX_STUDENT, "html"))
        }
    };

    let out = args.out.unwrap_or_else(|| PathBuf::from(default_name));
    fs::write(&out, content).with_context(|| format!("writing {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}

fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}
