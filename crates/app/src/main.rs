use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use geo_core::model::CategorySelection;
use services::{AppServices, Clock, QuizCommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};

mod terminal;

use terminal::{
    QuizInput, parse_menu_choice, parse_quiz_input, prompt_line, render_categories,
    render_learning, render_menu, render_report, render_snapshot,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDataDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDataDir { raw } => write!(f, "invalid --data value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  geo-quiz [quiz]    [--data <dir>] [--category <name|ALL>] [--seed <n>]");
    eprintln!("  geo-quiz learn     [--data <dir>] [--category <name>]");
    eprintln!("  geo-quiz validate  [--data <dir>]");
    eprintln!("  geo-quiz categories [--data <dir>]");
    eprintln!();
    eprintln!("Quiz prompt: a number or name guesses, an empty line submits nothing,");
    eprintln!("  :reset restarts, :menu picks another category, :quit exits.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data data");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  GEO_QUIZ_DATA_DIR, GEO_QUIZ_SEED, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Learn,
    Validate,
    Categories,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "learn" => Some(Self::Learn),
            "validate" => Some(Self::Validate),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }

    fn takes_category(self) -> bool {
        matches!(self, Self::Quiz | Self::Learn)
    }

    fn takes_seed(self) -> bool {
        matches!(self, Self::Quiz)
    }
}

struct Args {
    data_dir: PathBuf,
    category: Option<CategorySelection>,
    seed: Option<u64>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_dir = std::env::var("GEO_QUIZ_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from("data"), PathBuf::from);
        let mut seed = match std::env::var("GEO_QUIZ_SEED") {
            Ok(raw) => Some(parse_seed(raw)?),
            Err(_) => None,
        };
        let mut category = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    let value = require_value(args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataDir { raw: value });
                    }
                    data_dir = PathBuf::from(value);
                }
                "--category" if cmd.takes_category() => {
                    let value = require_value(args, "--category")?;
                    category = value.parse().ok();
                }
                "--seed" if cmd.takes_seed() => {
                    seed = Some(parse_seed(require_value(args, "--seed")?)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_dir,
            category,
            seed,
        })
    }
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: start the quiz when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(ExitCode::SUCCESS);
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(cmd, &mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Only catalog loading is async; the prompt loops below block on stdin.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let services = runtime.block_on(AppServices::from_json_dir(
        &parsed.data_dir,
        Clock::default_clock(),
        parsed.seed,
    ))?;
    drop(runtime);
    info!(data_dir = %parsed.data_dir.display(), ?cmd, "catalog ready");

    let mut out = io::stdout().lock();
    match cmd {
        Command::Quiz => {
            run_quiz(&services, parsed.category, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Learn => {
            run_learn(&services, parsed.category, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate => {
            let report = services.validate();
            render_report(&mut out, &report)?;
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Categories => {
            render_categories(&mut out, &services.learning().categories())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_quiz(
    services: &AppServices,
    preselected: Option<CategorySelection>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let quiz = services.quiz();
    let options = quiz.selections();
    let mut controller = quiz.controller();
    let mut input = io::stdin().lock();
    let mut pending = preselected;

    loop {
        let selection = match pending.take() {
            Some(selection) => selection,
            None => {
                render_menu(out, &options)?;
                let Some(line) = prompt_line(&mut input, out, "category> ")? else {
                    return Ok(());
                };
                if line.trim() == ":quit" {
                    return Ok(());
                }
                match parse_menu_choice(&line, &options) {
                    Some(selection) => selection,
                    None => continue,
                }
            }
        };

        let mut snapshot = match controller.handle(QuizCommand::SelectCategory(selection)) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        loop {
            render_snapshot(out, &snapshot)?;
            if snapshot.is_finished() {
                writeln!(out, "Type :reset to play again or :menu to pick another category.")?;
            }
            let Some(line) = prompt_line(&mut input, out, "> ")? else {
                return Ok(());
            };
            match parse_quiz_input(&line, &snapshot.candidate_list) {
                QuizInput::Quit => return Ok(()),
                QuizInput::Command(QuizCommand::ReturnToMenu) => {
                    controller.handle(QuizCommand::ReturnToMenu)?;
                    break;
                }
                QuizInput::Command(command) => snapshot = controller.handle(command)?,
            }
        }
    }
}

fn run_learn(
    services: &AppServices,
    preselected: Option<CategorySelection>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let learning = services.learning();
    let category = match preselected {
        Some(CategorySelection::Category(id)) => id,
        Some(CategorySelection::All) => {
            writeln!(out, "learning mode needs a single category")?;
            return Ok(());
        }
        None => {
            let options: Vec<CategorySelection> = learning
                .categories()
                .into_iter()
                .map(CategorySelection::Category)
                .collect();
            render_menu(out, &options)?;
            let mut input = io::stdin().lock();
            let Some(line) = prompt_line(&mut input, out, "category> ")? else {
                return Ok(());
            };
            match parse_menu_choice(&line, &options) {
                Some(CategorySelection::Category(id)) => id,
                _ => {
                    writeln!(out, "learning mode needs a single category")?;
                    return Ok(());
                }
            }
        }
    };

    match learning.overview(&category) {
        Ok(overview) => render_learning(out, &overview)?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(())
}

fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the quiz prompt.
    tracing_subscriber::registry()
        .with(log_fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            // At this layer (binary glue), printing once is fine.
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
