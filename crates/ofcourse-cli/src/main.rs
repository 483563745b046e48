mod cmd;
mod output;
mod root;
mod terminal;

use clap::{Parser, Subcommand};
use ofcourse_core::openshift::DEFAULT_API_URL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ofcourse",
    about = "Scaffold, validate and deploy static course websites",
    version,
    propagate_version = true
)]
struct Cli {
    /// Course root (default: auto-detect from site.yaml or .git/)
    #[arg(long, global = true, env = "OFCOURSE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new course site in the current directory
    New,

    /// Refresh templates and static assets from this version of ofcourse
    Sync {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Check course, assignment and participant files; exit code is the number of errors
    Validate,

    /// Push the course site to OpenShift
    #[command(alias = "openshift")]
    Deploy {
        /// App to deploy to (default: course.openshift.app_name in site.yaml)
        #[arg(long, short = 'a')]
        app: Option<String>,

        /// OpenShift username, used when a new token is needed
        #[arg(long, short = 'u')]
        user: Option<String>,

        /// OpenShift domain (default: the account's first domain)
        #[arg(long, short = 'd')]
        domain: Option<String>,

        /// Show progress messages
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Broker REST endpoint
        #[arg(long, env = "OFCOURSE_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Where the session token is kept (default: ~/.ofcourse.token)
        #[arg(long, env = "OFCOURSE_TOKEN_FILE")]
        token_file: Option<PathBuf>,
    },

    /// Show the ofcourse version
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Deploy { verbose: true, .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();

    let result = match cli.command {
        Commands::New => cmd::new::run(&root::explicit_or_cwd(root_path)),
        Commands::Sync { yes } => cmd::sync::run(&root::resolve_root(root_path), yes),
        Commands::Validate => match cmd::validate::run(&root::resolve_root(root_path), cli.json) {
            Ok(0) => Ok(()),
            Ok(errors) => std::process::exit(cmd::validate::exit_code(errors)),
            Err(e) => Err(e),
        },
        Commands::Deploy {
            app,
            user,
            domain,
            verbose,
            api_url,
            token_file,
        } => cmd::deploy::run(
            &root::resolve_root(root_path),
            cmd::deploy::DeployArgs {
                app,
                user,
                domain,
                verbose,
                api_url,
                token_file,
            },
        ),
        Commands::Version => cmd::version::run(cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
