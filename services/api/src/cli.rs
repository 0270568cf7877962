use crate::demo::{run_demo, run_issues, run_match, DemoArgs, IssuesArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use voter_match::error::AppError;
use voter_match::matching::RangePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "VoterEd Match Service",
    about = "Serve and exercise the VoterEd candidate matching service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List quiz issues, optionally scoped to a region
    Issues(IssuesArgs),
    /// Score a saved set of quiz responses against the candidate directory
    Match(MatchArgs),
    /// Run an end-to-end quiz demo against the bundled sample directory
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Folder with issues.csv, candidates.csv, and candidate_positions.csv
    #[arg(long)]
    pub(crate) directory: Option<PathBuf>,
    /// Handling of out-of-range positions and importances (reject or clamp)
    #[arg(long, value_parser = crate::infra::parse_range_policy)]
    pub(crate) range_policy: Option<RangePolicy>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Issues(args) => run_issues(args),
        Command::Match(args) => run_match(args),
        Command::Demo(args) => run_demo(args),
    }
}
