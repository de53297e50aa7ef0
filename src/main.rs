use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use typst_sync::{
    commands::{self, CreateOptions},
    config::{ConfigKey, FileConfig, LayeredConfig},
    editor::{Editor, TerminalEditor},
    git::GitCli,
    http::build_http_client,
    package::{PackageIndex, PreviewIndex},
    runtime::RealRuntime,
};

/// typst-sync - Typst local packages, synced with git
///
/// Manages the local Typst packages under {data_dir}/typst/packages/local and
/// keeps {data_dir}/typst in sync with a remote git repository.
///
/// Examples:
///   typst-sync create mylib            # Scaffold @local/mylib:0.1.0
///   typst-sync import --document a.typ # Insert an import into a.typ
///   typst-sync push                    # Commit and push local packages
#[derive(Parser, Debug)]
#[command(author, version = env!("TYPST_SYNC_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base data directory (overrides the config file; also via TYPST_SYNC_DATA_DIR)
    #[arg(
        long = "data-dir",
        env = "TYPST_SYNC_DATA_DIR",
        value_name = "PATH",
        global = true
    )]
    pub data_dir: Option<PathBuf>,

    /// Remote git repository to sync with (also via TYPST_SYNC_REPO)
    #[arg(
        long = "sync-repo",
        env = "TYPST_SYNC_REPO",
        value_name = "URL",
        global = true
    )]
    pub sync_repo: Option<String>,

    /// Config file (defaults to {config_dir}/typst-sync/config.toml)
    #[arg(
        long = "config",
        env = "TYPST_SYNC_CONFIG",
        value_name = "PATH",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Preview package index URL
    #[arg(long = "index-url", value_name = "URL", global = true, hide = true)]
    pub index_url: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Pick a package and insert its import statement
    Import(ImportArgs),

    /// Create a local package
    Create(CreateArgs),

    /// Open the entry file of a local package
    Open(OpenArgs),

    /// List local (and preview) packages
    List(ListArgs),

    /// Commit local changes and push them to the sync repository
    Push,

    /// Pull changes from the sync repository
    Pull,

    /// Same as push, with its own completion message
    Sync,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Only offer local packages
    #[arg(long)]
    pub local_only: bool,

    /// Document to insert the import into (printed to stdout if omitted)
    #[arg(long, value_name = "FILE")]
    pub document: Option<PathBuf>,

    /// Insert before this 1-based line instead of appending
    #[arg(long, value_name = "N", requires = "document")]
    pub line: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Package name (prompted if omitted)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Package version, e.g. 0.1.0 (prompted if omitted)
    #[arg(long)]
    pub version: Option<String>,

    /// Entry file relative to the package, e.g. lib.typ (prompted if omitted)
    #[arg(long)]
    pub entrypoint: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct OpenArgs {
    /// Package reference like @local/mylib:0.1.0 (picked from a list if omitted)
    #[arg(value_name = "REFERENCE")]
    pub reference: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Also list the newest version of every preview package
    #[arg(long)]
    pub preview: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let editor = match &cli.command {
        Commands::Import(args) => {
            TerminalEditor::new().with_document(args.document.clone(), args.line)
        }
        _ => TerminalEditor::new(),
    };

    if let Err(e) = run(cli, &editor).await {
        editor.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, editor: &TerminalEditor) -> Result<()> {
    let runtime = RealRuntime;
    let config = LayeredConfig::new(FileConfig::new(&runtime, cli.config))
        .with_override(
            ConfigKey::DataDir,
            cli.data_dir.map(|dir| dir.to_string_lossy().into_owned()),
        )
        .with_override(ConfigKey::SyncRepo, cli.sync_repo);
    let git = GitCli::new();

    match cli.command {
        Commands::Import(args) => {
            let index = if args.local_only {
                None
            } else {
                Some(preview_index(cli.index_url)?)
            };
            let index = index.as_ref().map(|i| i as &dyn PackageIndex);
            commands::import(&runtime, &config, index, editor).await
        }
        Commands::Create(args) => {
            let options = CreateOptions {
                name: args.name,
                version: args.version,
                entrypoint: args.entrypoint,
            };
            commands::create(&runtime, &config, editor, options).map(|_| ())
        }
        Commands::Open(args) => {
            commands::open(&runtime, &config, editor, args.reference.as_deref()).map(|_| ())
        }
        Commands::List(args) => {
            let index = if args.preview {
                Some(preview_index(cli.index_url)?)
            } else {
                None
            };
            let index = index.as_ref().map(|i| i as &dyn PackageIndex);
            commands::list(&runtime, &config, index, editor).await
        }
        Commands::Push => commands::push(&runtime, &config, &git, editor).await,
        Commands::Pull => commands::pull(&runtime, &config, &git, editor).await,
        Commands::Sync => commands::sync(&runtime, &config, &git, editor).await,
    }
}

fn preview_index(url: Option<String>) -> Result<PreviewIndex> {
    Ok(PreviewIndex::new(build_http_client()?, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_import_parsing() {
        let cli = Cli::try_parse_from([
            "typst-sync",
            "import",
            "--local-only",
            "--document",
            "main.typ",
            "--line",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Import(args) => {
                assert!(args.local_only);
                assert_eq!(args.document, Some(PathBuf::from("main.typ")));
                assert_eq!(args.line, Some(3));
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_cli_line_requires_document() {
        let result = Cli::try_parse_from(["typst-sync", "import", "--line", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_create_parsing() {
        let cli = Cli::try_parse_from([
            "typst-sync",
            "create",
            "mylib",
            "--version",
            "1.0.0",
            "--entrypoint",
            "src/lib.typ",
        ])
        .unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.name.as_deref(), Some("mylib"));
                assert_eq!(args.version.as_deref(), Some("1.0.0"));
                assert_eq!(args.entrypoint.as_deref(), Some("src/lib.typ"));
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn test_cli_create_without_arguments() {
        let cli = Cli::try_parse_from(["typst-sync", "create"]).unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.name, None);
                assert_eq!(args.version, None);
                assert_eq!(args.entrypoint, None);
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn test_cli_global_options_parsing() {
        let cli = Cli::try_parse_from([
            "typst-sync",
            "push",
            "--data-dir",
            "/tmp/data",
            "--sync-repo",
            "git@example.com:me/typst.git",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Push));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(
            cli.sync_repo.as_deref(),
            Some("git@example.com:me/typst.git")
        );
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_open_and_list_parsing() {
        let cli = Cli::try_parse_from(["typst-sync", "open", "@local/mylib:0.1.0"]).unwrap();
        match cli.command {
            Commands::Open(args) => {
                assert_eq!(args.reference.as_deref(), Some("@local/mylib:0.1.0"))
            }
            _ => panic!("Expected Open command"),
        }

        let cli = Cli::try_parse_from(["typst-sync", "list", "--preview"]).unwrap();
        assert!(matches!(cli.command, Commands::List(ListArgs { preview: true })));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["typst-sync"]);
        assert!(result.is_err());
    }
}
