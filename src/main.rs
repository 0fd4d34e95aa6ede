use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vcs::areas::repository::Repository;
use vcs::errors::Result;

#[derive(Parser)]
#[command(
    name = "vcs",
    version = "0.1.0",
    about = "A local content-addressed version control engine",
    long_about = "A local, single-user version control engine storing snapshots \
    as a content-addressed object DAG with a persistent staging index."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Add files or directories to the index")]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "commit", about = "Record a snapshot of the index")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(
            short,
            long,
            help = "Give the output in a stable, machine-readable format"
        )]
        porcelain: bool,
    },
    #[command(name = "log", about = "Show commit logs")]
    Log {
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
    },
    #[command(name = "branch", about = "Create, list, or delete branches")]
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },
}

#[derive(Subcommand)]
enum BranchAction {
    #[command(name = "create", about = "Create a new branch at the current commit")]
    Create {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: String,
    },
    #[command(name = "list", about = "List all branches")]
    List,
    #[command(name = "delete", about = "Delete a branch")]
    Delete {
        #[arg(index = 1, help = "The name of the branch to delete")]
        name: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VCS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let stdout = || Box::new(std::io::stdout()) as Box<dyn std::io::Write>;

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => std::path::PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            let mut repository = Repository::new(path, stdout())?;
            repository.init()?
        }
        Commands::Add { paths } => {
            let mut repository = Repository::open(std::env::current_dir()?, stdout())?;
            repository.add(paths)?
        }
        Commands::Commit { message } => {
            let mut repository = Repository::open(std::env::current_dir()?, stdout())?;
            repository.commit(message)?
        }
        Commands::Status { porcelain } => {
            let mut repository = Repository::open(std::env::current_dir()?, stdout())?;
            repository.display_status(*porcelain)?
        }
        Commands::Log { oneline } => {
            let repository = Repository::open(std::env::current_dir()?, stdout())?;
            repository.log(*oneline)?
        }
        Commands::Branch { action } => {
            let repository = Repository::open(std::env::current_dir()?, stdout())?;
            match action {
                BranchAction::Create { name } => repository.create_branch(name)?,
                BranchAction::List => repository.list_branches()?,
                BranchAction::Delete { name } => repository.delete_branch(name)?,
            }
        }
    }

    Ok(())
}
