use crate::commands::{
    run_chain, run_inspect, run_outreach, run_qualify, run_scrub, run_skiptrace, ChainArgs,
    InspectArgs, OutreachArgs, QualifyArgs, ScrubArgs, SkiptraceArgs,
};
use clap::{Parser, Subcommand};
use dealflow::config::AppConfig;
use dealflow::error::AppError;
use dealflow::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "dealflow",
    about = "Scrub, underwrite, and draft outreach for property lead lists",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draft a first-touch message for every lead (default command)
    Outreach(OutreachArgs),
    /// Filter a raw list down to the buy box and append a MAO column
    Scrub(ScrubArgs),
    /// Reshape a list into the file a skip-trace vendor ingests
    Skiptrace(SkiptraceArgs),
    /// Show how a file parses and where each column role binds
    Inspect(InspectArgs),
    /// Underwrite a single property from the command line
    Qualify(QualifyArgs),
    /// Scrub a raw list, then draft outreach for the survivors
    Run(ChainArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Outreach(OutreachArgs::default()));

    match command {
        Command::Outreach(args) => run_outreach(args, &config),
        Command::Scrub(args) => run_scrub(args, &config),
        Command::Skiptrace(args) => run_skiptrace(args, &config),
        Command::Inspect(args) => run_inspect(args, &config),
        Command::Qualify(args) => run_qualify(args),
        Command::Run(args) => run_chain(args, &config),
    }
}
