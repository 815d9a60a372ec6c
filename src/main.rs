use clap::{Parser, Subcommand};
use notegit::commands::*;
use notegit::core::{error::Result, print_error};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notegit")]
#[command(about = "Markdown notes kept in a git repository")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show staged and unstaged changes
    Status,
    /// Stage files for the next commit
    Stage {
        /// Files to stage, relative to the notes directory
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        files: Vec<String>,
        /// Stage every unstaged change
        #[arg(short, long)]
        all: bool,
    },
    /// Remove files from the staging area
    Unstage {
        /// Files to unstage, relative to the notes directory
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        files: Vec<String>,
        /// Unstage every staged change
        #[arg(short, long)]
        all: bool,
    },
    /// Commit the staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Push the current branch to the configured remote
    Push,
    /// Pull the current branch from the configured remote
    Pull,
    /// Create or adopt a notes repository
    Init {
        /// Notes directory (defaults to the configured one, then the current directory)
        path: Option<PathBuf>,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage note files
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Set the notes directory
    SetRoot { path: PathBuf },
    /// Set the remote repository URL
    SetRemote { url: String },
    /// Set the access token used for push and pull
    SetToken { token: String },
    /// Set the commit author
    SetAuthor { name: String, email: String },
}

#[derive(Subcommand)]
enum NotesCommands {
    /// List every markdown note
    List,
    /// Print a note
    Read { path: PathBuf },
    /// Replace a note with the content read from stdin
    Write { path: PathBuf },
    /// Create an empty note
    New { path: PathBuf },
    /// Delete a note
    Rm { path: PathBuf },
    /// Move or rename a note
    Mv { from: PathBuf, to: PathBuf },
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Status => execute_status().await,
        Commands::Stage { files, all } => execute_stage(files, all).await,
        Commands::Unstage { files, all } => execute_unstage(files, all).await,
        Commands::Commit { message } => execute_commit(message).await,
        Commands::Push => execute_push().await,
        Commands::Pull => execute_pull().await,
        Commands::Init { path } => execute_init(path),
        Commands::Config { command } => match command {
            ConfigCommands::Show => execute_config_show(),
            ConfigCommands::SetRoot { path } => execute_config_set_root(path),
            ConfigCommands::SetRemote { url } => execute_config_set_remote(url),
            ConfigCommands::SetToken { token } => execute_config_set_token(token),
            ConfigCommands::SetAuthor { name, email } => execute_config_set_author(name, email),
        },
        Commands::Notes { command } => match command {
            NotesCommands::List => execute_notes_list().await,
            NotesCommands::Read { path } => execute_notes_read(path).await,
            NotesCommands::Write { path } => execute_notes_write(path).await,
            NotesCommands::New { path } => execute_notes_new(path).await,
            NotesCommands::Rm { path } => execute_notes_remove(path).await,
            NotesCommands::Mv { from, to } => execute_notes_move(from, to).await,
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    let level = if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();

    if let Err(e) = run(cli.command).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
