//! `moot` command line: browse the catalog, read reports, submit recordings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use moot::core::icons::Icon;
use moot::core::listing::{
    ALL, Criteria, DateRange, ExerciseSort, ListView, ResourceSort, SubmissionSort,
};
use moot::core::types::{Exercise, Resource, Submission};
use moot::core::wizard::{DESCRIPTION_SOFT_LIMIT, WizardError};
use moot::exit_codes;
use moot::io::catalog_store::{load_catalog, write_catalog};
use moot::io::config::{DEFAULT_CONFIG_FILE, MootConfig, write_config};
use moot::io::transport::SimulatedTransport;
use moot::library::{Library, calendar_day};
use moot::logging;
use moot::report::{EXPORT_NOT_IMPLEMENTED, ReportRenderer};
use moot::submit::{SubmitRequest, run_submission};

#[derive(Parser)]
#[command(
    name = "moot",
    version,
    about = "Practice platform for legal mooting exercises"
)]
struct Cli {
    /// Config file; missing means built-in defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Evaluate date windows as of this day (YYYY-MM-DD) instead of today (UTC).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List exercises in the library.
    Exercises(ExerciseArgs),
    /// Show one exercise.
    Exercise { id: u32 },
    /// List past submissions.
    Submissions(SubmissionArgs),
    /// List saved resources.
    Resources(ResourceArgs),
    /// Summary of submissions and scores.
    Dashboard,
    /// Show a feedback report.
    Report {
        /// Submission id; unknown or absent ids show the default report.
        #[arg(long)]
        submission: Option<String>,
        #[arg(long)]
        export: bool,
        #[arg(long)]
        pdf: bool,
    },
    /// Upload a recording and submit it for analysis.
    Submit(SubmitArgs),
    /// Validate or export catalog files.
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Manage the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct ExerciseArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = ALL)]
    subject: String,
    /// Beginner, Intermediate or Advanced.
    #[arg(long, default_value = ALL)]
    difficulty: String,
    /// rating, popularity, difficulty, time or name.
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Args)]
struct SubmissionArgs {
    #[arg(long, default_value = "")]
    search: String,
    /// Analyzed, Processing or Failed.
    #[arg(long, default_value = ALL)]
    status: String,
    #[arg(long, default_value = ALL)]
    subject: String,
    #[arg(long, default_value = "all", value_parser = parse_range)]
    range: DateRange,
    /// recent, score-high, score-low or exercise.
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Args)]
struct ResourceArgs {
    #[arg(long, default_value = "")]
    search: String,
    /// LegalDatabase, SubjectGuide or Tutorial.
    #[arg(long = "type", default_value = ALL)]
    resource_type: String,
    #[arg(long, default_value = ALL)]
    category: String,
    /// Completed, InProgress or Bookmarked.
    #[arg(long, default_value = ALL)]
    status: String,
    #[arg(long, default_value = "all", value_parser = parse_range)]
    range: DateRange,
    /// recent or name.
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    exercise: u32,
    /// Recorded argument (mp4, mov or webm).
    #[arg(long)]
    video: PathBuf,
    /// Optional skeleton argument (doc, docx or pdf).
    #[arg(long)]
    skeleton: Option<PathBuf>,
    /// Supporting case file; repeatable. Unsupported types are skipped.
    #[arg(long = "case-file")]
    case_files: Vec<PathBuf>,
    #[arg(long)]
    description: String,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Check a catalog file against the schema and invariants.
    Validate { path: PathBuf },
    /// Write the active catalog to a file.
    Dump { path: PathBuf },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            if err.downcast_ref::<WizardError>().is_some() {
                eprintln!("rejected: {:#}", err);
                std::process::exit(exit_codes::REJECTED);
            }
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| calendar_day(Utc::now()));
    let out = Output { json: cli.json };
    match cli.command {
        Command::Exercises(args) => cmd_exercises(&open(&cli.config)?, &out, args, today),
        Command::Exercise { id } => cmd_exercise(&open(&cli.config)?, &out, id),
        Command::Submissions(args) => cmd_submissions(&open(&cli.config)?, &out, args, today),
        Command::Resources(args) => cmd_resources(&open(&cli.config)?, &out, args, today),
        Command::Dashboard => cmd_dashboard(&open(&cli.config)?, &out, today),
        Command::Report {
            submission,
            export,
            pdf,
        } => cmd_report(&open(&cli.config)?, &out, submission.as_deref(), export || pdf),
        Command::Submit(args) => cmd_submit(&open(&cli.config)?, &out, args),
        Command::Catalog(CatalogCommand::Validate { path }) => cmd_catalog_validate(&path),
        Command::Catalog(CatalogCommand::Dump { path }) => {
            let library = open(&cli.config)?;
            write_catalog(&path, library.catalog())?;
            println!("wrote {}", path.display());
            Ok(exit_codes::OK)
        }
        Command::Config(ConfigCommand::Init { force }) => cmd_config_init(&cli.config, force),
    }
}

fn open(config: &Path) -> Result<Library> {
    Library::open(config)
}

fn parse_range(raw: &str) -> Result<DateRange, String> {
    DateRange::parse(raw).ok_or_else(|| format!("expected 'all' or 'last30days', got '{}'", raw))
}

/// Sort keys are lenient: anything unrecognised keeps catalog order.
fn parse_sort<K>(raw: Option<&str>, parse: impl Fn(&str) -> Option<K>) -> Option<K> {
    let raw = raw?;
    let key = parse(raw);
    if key.is_none() {
        debug!(sort = raw, "unknown sort key; keeping catalog order");
    }
    key
}

struct Output {
    json: bool,
}

impl Output {
    fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("serialize output")?
        );
        Ok(())
    }

    fn list<R: Serialize>(
        &self,
        view: &ListView<R>,
        noun: &str,
        row: impl Fn(&R) -> String,
    ) -> Result<i32> {
        if self.json {
            self.json(view)?;
        } else {
            for item in &view.items {
                println!("{}", row(item));
            }
            println!("{} of {} {}", view.items.len(), view.total, noun);
        }
        Ok(if view.is_empty() {
            exit_codes::EMPTY
        } else {
            exit_codes::OK
        })
    }
}

fn cmd_exercises(
    library: &Library,
    out: &Output,
    args: ExerciseArgs,
    today: NaiveDate,
) -> Result<i32> {
    let criteria = Criteria::default()
        .with_search(args.search)
        .with_filter("subject", args.subject)
        .with_filter("difficulty", args.difficulty)
        .with_sort(parse_sort(args.sort.as_deref(), ExerciseSort::parse));
    let view = library.exercises(&criteria, today);
    out.list(&view, "exercises", exercise_row)
}

fn exercise_row(exercise: &Exercise) -> String {
    format!(
        "{} {:>3}  {}  [{} | {} | {}]  {:.1}/5",
        Icon::for_subject(&exercise.subject).resource().glyph,
        exercise.id,
        exercise.title,
        exercise.subject,
        exercise.difficulty.as_str(),
        exercise.time,
        exercise.rating,
    )
}

fn cmd_exercise(library: &Library, out: &Output, id: u32) -> Result<i32> {
    let found = library
        .exercise(id)
        .ok_or_else(|| anyhow!("no exercise {} ({})", id, library.exercise_name(id)))?;
    if out.json {
        out.json(found.exercise)?;
        return Ok(exit_codes::OK);
    }
    let exercise = found.exercise;
    println!("{}", exercise_row(exercise));
    println!();
    println!("{}", exercise.description);
    println!();
    println!(
        "attempts: {}  completions: {}  source: {}",
        exercise.attempts, exercise.completions, found.source
    );
    Ok(exit_codes::OK)
}

fn cmd_submissions(
    library: &Library,
    out: &Output,
    args: SubmissionArgs,
    today: NaiveDate,
) -> Result<i32> {
    let criteria = Criteria::default()
        .with_search(args.search)
        .with_filter("status", args.status)
        .with_filter("subject", args.subject)
        .with_date_range(args.range)
        .with_sort(parse_sort(args.sort.as_deref(), SubmissionSort::parse));
    let view = library.submissions(&criteria, today);
    out.list(&view, "submissions", submission_row)
}

fn submission_row(submission: &Submission) -> String {
    let score = match (submission.score, submission.grade.as_deref()) {
        (Some(score), Some(grade)) => format!("{}/100 {}", score, grade),
        (Some(score), None) => format!("{}/100", score),
        (None, _) => "-".to_string(),
    };
    format!(
        "{} {}  {}  v{}  {}  {}  {}",
        Icon::for_status(submission.status).resource().glyph,
        submission.id,
        submission.submission_date,
        submission.version,
        submission.exercise_name,
        submission.status.as_str(),
        score,
    )
}

fn cmd_resources(
    library: &Library,
    out: &Output,
    args: ResourceArgs,
    today: NaiveDate,
) -> Result<i32> {
    let criteria = Criteria::default()
        .with_search(args.search)
        .with_filter("type", args.resource_type)
        .with_filter("category", args.category)
        .with_filter("status", args.status)
        .with_date_range(args.range)
        .with_sort(parse_sort(args.sort.as_deref(), ResourceSort::parse));
    let view = library.resources(&criteria, today);
    out.list(&view, "resources", resource_row)
}

fn resource_row(resource: &Resource) -> String {
    format!(
        "{} {:>3}  {}  [{} | {}]  {}  {}",
        Icon::for_resource_type(resource.resource_type).resource().glyph,
        resource.id,
        resource.name,
        resource.resource_type.as_str(),
        resource.category,
        resource.accessed_date,
        resource.status.map_or("-", |status| status.as_str()),
    )
}

fn cmd_dashboard(library: &Library, out: &Output, today: NaiveDate) -> Result<i32> {
    let board = library.dashboard(today);
    if out.json {
        out.json(&board)?;
        return Ok(exit_codes::OK);
    }
    println!("exercises available: {}", board.exercises_available);
    println!(
        "submissions: {} ({} analyzed, {} in the last 30 days)",
        board.total_submissions, board.analyzed_submissions, board.submissions_last_30_days
    );
    match board.average_score {
        Some(avg) => println!("average score: {:.1}", avg),
        None => println!("average score: -"),
    }
    println!("recent activity:");
    for submission in &board.recent {
        println!("  {}", submission_row(submission));
    }
    Ok(exit_codes::OK)
}

fn cmd_report(
    library: &Library,
    out: &Output,
    submission: Option<&str>,
    export: bool,
) -> Result<i32> {
    if export {
        println!("{}", EXPORT_NOT_IMPLEMENTED);
        return Ok(exit_codes::OK);
    }
    let selection = library.report(submission);
    if out.json {
        out.json(&selection)?;
    } else {
        print!("{}", ReportRenderer::new()?.render(&selection)?);
    }
    Ok(exit_codes::OK)
}

fn cmd_submit(library: &Library, out: &Output, args: SubmitArgs) -> Result<i32> {
    let chars = args.description.chars().count();
    if chars > DESCRIPTION_SOFT_LIMIT {
        eprintln!(
            "note: description is {}/{} characters",
            chars, DESCRIPTION_SOFT_LIMIT
        );
    }
    let request = SubmitRequest {
        exercise_id: args.exercise,
        video: args.video,
        skeleton_argument: args.skeleton,
        case_files: args.case_files,
        description: args.description,
    };
    let transport = SimulatedTransport::from_config(&library.config().latency);
    let outcome = run_submission(library, &transport, &request, Utc::now)?;
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    if out.json {
        out.json(&outcome)?;
    } else {
        println!(
            "submitted {} for {}",
            outcome.payload.reference, outcome.exercise_name
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_catalog_validate(path: &Path) -> Result<i32> {
    let catalog = load_catalog(path)?;
    println!(
        "ok: {} exercises, {} submissions, {} resources, {} reports",
        catalog.exercises.len(),
        catalog.submissions.len(),
        catalog.resources.len(),
        catalog.reports.len()
    );
    Ok(exit_codes::OK)
}

fn cmd_config_init(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if force && path.exists() {
        fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    }
    write_config(path, &MootConfig::default())?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_submissions_with_range() {
        let cli = Cli::parse_from([
            "moot",
            "submissions",
            "--range",
            "last30days",
            "--sort",
            "score-high",
        ]);
        match cli.command {
            Command::Submissions(args) => {
                assert_eq!(args.range, DateRange::Last30Days);
                assert_eq!(args.status, ALL);
            }
            _ => panic!("expected submissions"),
        }
    }

    #[test]
    fn rejects_unknown_range() {
        assert!(Cli::try_parse_from(["moot", "submissions", "--range", "week"]).is_err());
    }

    #[test]
    fn unknown_sort_keeps_order() {
        assert_eq!(parse_sort(Some("shuffle"), ExerciseSort::parse), None);
        assert_eq!(
            parse_sort(Some("rating"), ExerciseSort::parse),
            Some(ExerciseSort::Rating)
        );
    }

    #[test]
    fn parse_repeated_case_files() {
        let cli = Cli::parse_from([
            "moot",
            "submit",
            "--exercise",
            "2",
            "--video",
            "a.mp4",
            "--case-file",
            "x.pdf",
            "--case-file",
            "y.pdf",
            "--description",
            "d",
        ]);
        match cli.command {
            Command::Submit(args) => assert_eq!(args.case_files.len(), 2),
            _ => panic!("expected submit"),
        }
    }
}
