#![forbid(unsafe_code)]

mod cmd;
mod output;

use cadence_core::error::CadenceError;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cadence: recurring compliance-task scheduler",
    long_about = None
)]
struct Cli {
    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, and TTY state.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a cadence schedule",
        long_about = "Initialize a cadence schedule in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    cad init\n\n    # Re-create an existing schedule\n    cad init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Import tasks from a JSON file",
        long_about = "Import task records (policy/task/periodicity/due_date) from a JSON array.",
        after_help = "EXAMPLES:\n    # Load a task dataset\n    cad import tasks.json\n\n    # Emit machine-readable output\n    cad import tasks.json --json"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tasks",
        long_about = "List tasks with optional policy/periodicity filters.",
        after_help = "EXAMPLES:\n    # List every task\n    cad list\n\n    # Filter by policy and periodicity\n    cad list --policy \"Access Control Policy\" --periodicity quarterly\n\n    # Emit machine-readable output\n    cad list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one task",
        long_about = "Show full details and upcoming occurrences for a single task by index.",
        after_help = "EXAMPLES:\n    # Show task 3\n    cad show 3\n\n    # Emit machine-readable output\n    cad show 3 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Render the occurrence calendar",
        long_about = "Render scheduled occurrences for a month, week, or day window.",
        after_help = "EXAMPLES:\n    # This month\n    cad calendar\n\n    # A specific week\n    cad calendar --view week --date 2025-11-12\n\n    # Next month\n    cad calendar --offset 1\n\n    # Emit machine-readable output\n    cad calendar --json"
    )]
    Calendar(cmd::calendar::CalendarArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Complete an occurrence of a task",
        long_about = "Record a completion for a task's occurrence and advance its due date.",
        after_help = "EXAMPLES:\n    # Complete the current occurrence of task 3\n    cad complete 3 --by \"J. Doe\"\n\n    # Complete a specific occurrence\n    cad complete 3 --date 2025-11-12\n\n    # Emit machine-readable output\n    cad complete 3 --json"
    )]
    Complete(cmd::complete::CompleteArgs),

    #[command(
        next_help_heading = "Metadata",
        about = "Set completed-by / verified-by names",
        long_about = "Update the recorded completed-by and verified-by names for a task.",
        after_help = "EXAMPLES:\n    # Record who completes and verifies task 3\n    cad assign 3 --completed-by \"J. Doe\" --verified-by \"A. Smith\"\n\n    # Emit machine-readable output\n    cad assign 3 --completed-by \"J. Doe\" --json"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    cad completions bash\n\n    # Generate zsh completions\n    cad completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Configure the tracing subscriber from `CADENCE_LOG` (env-filter syntax)
/// with `CADENCE_LOG_FORMAT=json` switching to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CADENCE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "cadence=debug,info"
        } else {
            "cadence=info,warn"
        })
    });

    let format = env::var("CADENCE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    let command_result = match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, cli.quiet, &project_root),
        Commands::Import(args) => cmd::import::run_import(args, output, cli.quiet, &project_root),
        Commands::List(args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(args, output, &project_root),
        Commands::Calendar(args) => cmd::calendar::run_calendar(args, output, &project_root),
        Commands::Complete(args) => {
            cmd::complete::run_complete(args, output, cli.quiet, &project_root)
        }
        Commands::Assign(args) => cmd::assign::run_assign(args, output, cli.quiet, &project_root),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    };

    if let Err(err) = command_result {
        let cli_error = err
            .downcast_ref::<CadenceError>()
            .map_or_else(|| CliError::new(format!("{err:#}")), CliError::from);
        output::render_error(output, &cli_error)?;
        std::process::exit(1);
    }
    Ok(())
}
