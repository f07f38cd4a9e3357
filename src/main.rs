use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use revsift::areas::repository::Repository;
use revsift::commands::porcelain::log::LogOptions;

#[derive(Parser)]
#[command(
    name = "revsift",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Sift commit history through composable filters",
    long_about = "revsift walks the history of a git repository and evaluates composable \
    filters on every commit: message patterns, change kinds, touched paths and changed-line \
    counts. Merge commits are judged by the changes they introduce themselves, not the ones \
    inherited from a parent.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "REVSIFT_REPO",
        default_value = ".",
        help = "Path inside the repository to inspect"
    )]
    repo: String,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "log",
        about = "Show the commits matching the given filters",
        long_about = "This command walks history from the given revisions (HEAD by default), \
        following every parent, and prints the commits accepted by all given filters."
    )]
    Log {
        #[arg(index = 1, help = "Revisions to start from")]
        revisions: Vec<String>,
        #[arg(long, conflicts_with = "revisions", help = "Walk every branch separately")]
        all: bool,
        #[arg(short = 'n', long, help = "Stop after this many matching commits")]
        max_count: Option<u64>,
        #[arg(long, help = "Only commits whose message matches this regex")]
        grep: Option<String>,
        #[arg(
            long,
            help = "Only commits with changes of these kinds (A added, D deleted, M modified)"
        )]
        diff_filter: Option<String>,
        #[arg(long, help = "Only commits changing at least this many lines")]
        min_lines: Option<usize>,
        #[arg(long, help = "Only commits changing at most this many lines")]
        max_lines: Option<usize>,
        #[arg(long, help = "Show one line per commit")]
        oneline: bool,
        #[arg(long, help = "Show the changed paths of each commit")]
        stat: bool,
        #[arg(index = 2, last = true, help = "Only commits touching these paths")]
        paths: Vec<String>,
    },
    #[command(
        name = "diff-tree",
        about = "Show the changes introduced by a commit",
        long_about = "This command prints the paths a commit changes. For a merge commit, only \
        the paths differing from every parent are shown."
    )]
    DiffTree {
        #[arg(index = 1, help = "The commit to inspect")]
        revision: String,
    },
}

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let repository = Repository::new(&cli.repo, Box::new(std::io::stdout()))?;

    match cli.command {
        Commands::Log {
            revisions,
            all,
            max_count,
            grep,
            diff_filter,
            min_lines,
            max_lines,
            oneline,
            stat,
            paths,
        } => repository.log(&LogOptions {
            revisions,
            all,
            max_count,
            grep,
            diff_filter,
            min_lines,
            max_lines,
            paths,
            oneline,
            stat,
        })?,
        Commands::DiffTree { revision } => repository.diff_tree(&revision)?,
    }

    Ok(())
}
