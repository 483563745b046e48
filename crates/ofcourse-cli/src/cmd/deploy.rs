use crate::terminal::TerminalPrompter;
use anyhow::Context;
use ofcourse_core::config::CourseConfig;
use ofcourse_core::credentials::FileCredentialStore;
use ofcourse_core::deploy::{DeployOptions, DeployOutcome, Deployer};
use ofcourse_core::openshift::OpenShiftClient;
use ofcourse_core::vcs::Git;
use std::path::{Path, PathBuf};

pub struct DeployArgs {
    pub app: Option<String>,
    pub user: Option<String>,
    pub domain: Option<String>,
    pub verbose: bool,
    pub api_url: String,
    pub token_file: Option<PathBuf>,
}

pub fn run(root: &Path, args: DeployArgs) -> anyhow::Result<()> {
    let config = CourseConfig::load_if_present(root).context("failed to read site.yaml")?;

    let store = match args.token_file {
        Some(path) => FileCredentialStore::new(path),
        None => FileCredentialStore::in_home().context("cannot locate the token file")?,
    };

    let git = Git::new(root);
    let client = OpenShiftClient::new(&args.api_url, git.clone())
        .context("failed to set up the OpenShift client")?;

    if args.verbose {
        println!("Deploying {} via {}", root.display(), args.api_url);
    }

    let opts = DeployOptions {
        app: args.app,
        user: args.user,
        domain: args.domain,
    };
    let outcome = Deployer::new(&git, &store, &client, &TerminalPrompter)
        .with_config(config.as_ref())
        .run(&opts)?;

    match outcome {
        DeployOutcome::Deployed { app, url, created } => {
            if created {
                println!("Created app '{}' in domain '{}'", app.name, app.domain);
            }
            if args.verbose {
                println!("Pushed files to OpenShift app '{}'", app.name);
            }
            println!("Your app is now on OpenShift at {url}");
        }
        DeployOutcome::Cancelled(reason) => println!("{reason}"),
    }
    Ok(())
}
