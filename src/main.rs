mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use shelfwatch::output::OutputFormat;
use shelfwatch::RiskLevel;

#[derive(Parser)]
#[command(
    name = "shelfwatch",
    about = "Marketplace listing compliance scorer",
    version
)]
struct Cli {
    #[arg(long, short, global = true, help = "Enable debug logging on stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Score one or more listings from a JSON file or stdin
    Evaluate(EvaluateArgs),
    /// Inspect the rule catalog
    Rules(RulesArgs),
    /// Write a shelfwatch.toml preset
    Init(InitArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FailOn {
    Medium,
    High,
}

impl FailOn {
    fn is_hit(self, risk: RiskLevel) -> bool {
        match self {
            Self::Medium => risk != RiskLevel::Safe,
            Self::High => risk == RiskLevel::HighRisk,
        }
    }
}

#[derive(Parser)]
struct EvaluateArgs {
    #[arg(default_value = "-", help = "JSON file with a listing or an array of listings ('-' for stdin)")]
    path: PathBuf,

    #[arg(
        long,
        short,
        default_value = "terminal",
        help = "Output format: terminal, json, csv, markdown"
    )]
    format: OutputFormat,

    #[arg(long, short, help = "Configuration file (default: ./shelfwatch.toml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Configuration profile to use")]
    profile: Option<String>,

    #[arg(long, value_enum, help = "Exit with status 1 if any listing reaches this risk level")]
    fail_on: Option<FailOn>,

    #[arg(long, help = "CI-friendly output (no colors, ASCII-only markdown)")]
    ci: bool,
}

#[derive(Parser)]
struct RulesArgs {
    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Parser)]
enum RulesCommand {
    /// List built-in and configured rules
    List(RulesListArgs),
}

#[derive(Parser)]
struct RulesListArgs {
    #[arg(long, short, help = "Configuration file whose custom rules to include")]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct InitArgs {
    #[arg(
        long,
        default_value = "balanced",
        value_parser = ["balanced", "strict", "lenient"],
        help = "Configuration preset: balanced, strict, lenient"
    )]
    preset: String,

    #[arg(long, help = "Overwrite existing shelfwatch.toml if it already exists")]
    force: bool,
}

#[derive(Parser)]
struct CompletionsArgs {
    #[arg(help = "Target shell: bash, zsh, fish, elvish, powershell")]
    shell: Shell,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("SHELFWATCH_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Evaluate(args) => {
            let hit = cli::evaluate::run_evaluate(
                &args.path,
                args.format,
                args.config.as_deref(),
                args.profile.as_deref(),
                args.ci,
                |risk| args.fail_on.is_some_and(|f| f.is_hit(risk)),
            )?;
            if hit {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Rules(args) => match args.command {
            RulesCommand::List(list) => cli::rules::run_rules_list(list.config.as_deref()),
        },
        Command::Init(args) => cli::init::run_init(&args.preset, args.force),
        Command::Completions(args) => {
            generate(
                args.shell,
                &mut Cli::command(),
                "shelfwatch",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
