//! Deployment workflow.
//!
//! ```text
//! Start → CheckDirty → ResolveCredentials → ResolveApp → Push → Done
//!              │                                 │
//!              └──────────── Aborted ◄───────────┘   (user declined)
//! ```
//!
//! Two remote failures are recovered here and nowhere else: a cached token
//! that fails its probe (any error) falls back to one interactive
//! reauthentication, and an app lookup that fails (any error) offers to
//! create the app. Everything after that is fatal and surfaced as
//! [`DeployError`]. Declining a prompt is a [`DeployOutcome::Cancelled`],
//! never an error.

use crate::config::{CourseConfig, DEFAULT_CARTRIDGE};
use crate::credentials::CredentialStore;
use crate::error::OfcourseError;
use crate::openshift::{AppHandle, Platform, RemoteError};
use crate::paths;
use crate::prompt::Prompter;
use crate::vcs::VersionControl;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DIRTY_PROMPT: &str = "You have uncommitted changes. Changes that aren't committed \
                                won't be pushed to OpenShift.\nDo you want to continue?";
pub const USERNAME_PROMPT: &str = "OpenShift username";
pub const PASSWORD_PROMPT: &str = "OpenShift password";
pub const NEW_APP_NAME_PROMPT: &str = "Name for the new app";

// ---------------------------------------------------------------------------
// Options / outcome / errors
// ---------------------------------------------------------------------------

/// Command-line overrides. Anything left `None` is taken from `site.yaml`
/// or asked of the platform or the user.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub app: Option<String>,
    pub user: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Start,
    CheckDirty,
    ResolveCredentials,
    ResolveApp,
    Push,
    Done,
    Aborted,
}

impl DeployState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployState::Start => "start",
            DeployState::CheckDirty => "check_dirty",
            DeployState::ResolveCredentials => "resolve_credentials",
            DeployState::ResolveApp => "resolve_app",
            DeployState::Push => "push",
            DeployState::Done => "done",
            DeployState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cancelled {
    /// The user chose not to deploy with a dirty working copy.
    UncommittedChanges,
    /// The target app does not exist and the user chose not to create it.
    AppNotCreated { app: Option<String> },
}

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cancelled::UncommittedChanges => {
                write!(f, "Deployment cancelled: commit your changes and try again.")
            }
            Cancelled::AppNotCreated { app: Some(app) } => {
                write!(f, "Deployment cancelled: app '{app}' was not created.")
            }
            Cancelled::AppNotCreated { app: None } => {
                write!(f, "Deployment cancelled: no app was created.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed {
        app: AppHandle,
        url: String,
        created: bool,
    },
    Cancelled(Cancelled),
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("could not check the working copy")]
    WorkingCopy(#[source] OfcourseError),

    #[error("authentication failed")]
    Authentication(#[source] RemoteError),

    #[error("could not save the platform token")]
    SaveToken(#[source] OfcourseError),

    #[error("could not determine the default domain")]
    Domain(#[source] RemoteError),

    #[error("could not create app '{app}'")]
    CreateApp {
        app: String,
        #[source]
        source: RemoteError,
    },

    #[error("could not push to app '{app}'")]
    Push {
        app: String,
        #[source]
        source: RemoteError,
    },

    #[error(transparent)]
    Local(#[from] OfcourseError),
}

enum Resolution {
    Found(AppHandle),
    Created(AppHandle),
    Declined(Option<String>),
}

// ---------------------------------------------------------------------------
// Deployer
// ---------------------------------------------------------------------------

pub struct Deployer<'a> {
    vcs: &'a dyn VersionControl,
    store: &'a dyn CredentialStore,
    platform: &'a dyn Platform,
    prompter: &'a dyn Prompter,
    config: Option<&'a CourseConfig>,
    state: DeployState,
}

impl<'a> Deployer<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        store: &'a dyn CredentialStore,
        platform: &'a dyn Platform,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            vcs,
            store,
            platform,
            prompter,
            config: None,
            state: DeployState::Start,
        }
    }

    /// Use `site.yaml` settings as fallbacks for the app name, domain and cartridge.
    pub fn with_config(mut self, config: Option<&'a CourseConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> DeployState {
        self.state
    }

    fn enter(&mut self, next: DeployState) {
        debug!(from = %self.state, to = %next, "deploy transition");
        self.state = next;
    }

    fn abort(&mut self, reason: Cancelled) -> Result<DeployOutcome, DeployError> {
        self.enter(DeployState::Aborted);
        info!(%reason, "deployment cancelled");
        Ok(DeployOutcome::Cancelled(reason))
    }

    pub fn run(&mut self, opts: &DeployOptions) -> Result<DeployOutcome, DeployError> {
        self.enter(DeployState::CheckDirty);
        let dirty = self.vcs.is_dirty().map_err(DeployError::WorkingCopy)?;
        if dirty && !self.prompter.confirm(DIRTY_PROMPT)? {
            return self.abort(Cancelled::UncommittedChanges);
        }

        self.enter(DeployState::ResolveCredentials);
        let explicit_domain = opts
            .domain
            .clone()
            .or_else(|| self.config.and_then(|c| c.domain()).map(str::to_string));
        let token = self.resolve_token(opts, explicit_domain.as_deref())?;

        self.enter(DeployState::ResolveApp);
        let domain = match explicit_domain {
            Some(d) => d,
            None => self
                .platform
                .default_domain(&token)
                .map_err(DeployError::Domain)?,
        };
        debug!(%domain, "resolved domain");

        let (app, created) = match self.resolve_app(&token, &domain, opts)? {
            Resolution::Found(app) => (app, false),
            Resolution::Created(app) => (app, true),
            Resolution::Declined(app) => return self.abort(Cancelled::AppNotCreated { app }),
        };

        self.enter(DeployState::Push);
        info!(app = %app.name, domain = %app.domain, "pushing site");
        let url = self.platform.push(&app).map_err(|source| DeployError::Push {
            app: app.name.clone(),
            source,
        })?;

        self.enter(DeployState::Done);
        info!(%url, "deployment complete");
        Ok(DeployOutcome::Deployed { app, url, created })
    }

    /// A cached token that passes the probe, or a fresh one from the user.
    fn resolve_token(
        &self,
        opts: &DeployOptions,
        domain: Option<&str>,
    ) -> Result<String, DeployError> {
        let cached = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read cached token");
                None
            }
        };

        if let Some(token) = cached {
            match self.platform.list_apps(&token, domain) {
                Ok(_) => {
                    debug!("cached token accepted");
                    return Ok(token);
                }
                Err(e) => warn!(error = %e, "cached token probe failed; reauthenticating"),
            }
        } else {
            debug!("no cached token");
        }

        let user = match &opts.user {
            Some(user) => user.clone(),
            None => self.prompter.input(USERNAME_PROMPT)?,
        };
        let password = self.prompter.secret(PASSWORD_PROMPT)?;
        let token = self
            .platform
            .authenticate(&user, &password)
            .map_err(DeployError::Authentication)?;
        self.store.save(&token).map_err(DeployError::SaveToken)?;
        info!(%user, "authenticated and cached new token");
        Ok(token)
    }

    fn resolve_app(
        &self,
        token: &str,
        domain: &str,
        opts: &DeployOptions,
    ) -> Result<Resolution, DeployError> {
        let name = opts
            .app
            .clone()
            .or_else(|| self.config.and_then(|c| c.app_name()).map(str::to_string));

        let lookup = match &name {
            Some(name) => self.platform.get_app(token, name, domain),
            None => Err(RemoteError::NotFound("no app name configured".to_string())),
        };
        let error = match lookup {
            Ok(app) => {
                debug!(app = %app.name, "found existing app");
                return Ok(Resolution::Found(app));
            }
            Err(e) => e,
        };
        debug!(error = %error, "app lookup failed");

        let question = match &name {
            Some(name) => format!(
                "The app {name} could not be found, should I create it automatically?"
            ),
            None => "No app name is configured (use --app or course.openshift.app_name \
                     in site.yaml). Create a new app?"
                .to_string(),
        };
        if !self.prompter.confirm(&question)? {
            return Ok(Resolution::Declined(name));
        }

        let name = match name {
            Some(name) => name,
            None => self.prompter.input(NEW_APP_NAME_PROMPT)?,
        };
        paths::validate_app_name(&name)?;
        let cartridge = self
            .config
            .map(|c| c.cartridge())
            .unwrap_or(DEFAULT_CARTRIDGE);

        let app = self
            .platform
            .create_app(token, &name, domain, cartridge)
            .map_err(|source| DeployError::CreateApp {
                app: name.clone(),
                source,
            })?;
        info!(app = %app.name, %domain, "created app");
        Ok(Resolution::Created(app))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::error::Result;
    use crate::prompt::{Answer, Scripted};
    use std::cell::RefCell;

    struct FakeVcs {
        dirty: bool,
    }

    impl VersionControl for FakeVcs {
        fn is_dirty(&self) -> Result<bool> {
            Ok(self.dirty)
        }

        fn push(&self, _remote_url: &str, _branch: &str) -> Result<()> {
            unreachable!("the orchestrator pushes through the platform")
        }
    }

    struct FakePlatform {
        valid_tokens: RefCell<Vec<String>>,
        issued_token: Option<String>,
        default_domain: Option<String>,
        apps: RefCell<Vec<AppHandle>>,
        fail_create: bool,
        fail_push: bool,
        calls: RefCell<Vec<String>>,
    }

    impl Default for FakePlatform {
        fn default() -> Self {
            Self {
                valid_tokens: RefCell::new(vec!["good".to_string()]),
                issued_token: Some("fresh".to_string()),
                default_domain: Some("rit".to_string()),
                apps: RefCell::new(vec![app("mysite", "rit")]),
                fail_create: false,
                fail_push: false,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl FakePlatform {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn called(&self, prefix: &str) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn check_token(&self, token: &str) -> std::result::Result<(), RemoteError> {
            if self.valid_tokens.borrow().iter().any(|t| t == token) {
                Ok(())
            } else {
                Err(RemoteError::Unauthorized)
            }
        }
    }

    fn app(name: &str, domain: &str) -> AppHandle {
        AppHandle {
            name: name.to_string(),
            domain: domain.to_string(),
            url: format!("http://{name}-{domain}.rhcloud.com/"),
            git_url: format!("ssh://x@{name}-{domain}.rhcloud.com/~/git/{name}.git/"),
        }
    }

    impl Platform for FakePlatform {
        fn authenticate(&self, user: &str, _password: &str) -> std::result::Result<String, RemoteError> {
            self.record(format!("authenticate:{user}"));
            let token = self.issued_token.clone().ok_or(RemoteError::Unauthorized)?;
            self.valid_tokens.borrow_mut().push(token.clone());
            Ok(token)
        }

        fn list_apps(
            &self,
            token: &str,
            domain: Option<&str>,
        ) -> std::result::Result<Vec<AppHandle>, RemoteError> {
            self.record(format!("list_apps:{token}:{}", domain.unwrap_or("*")));
            self.check_token(token)?;
            Ok(self.apps.borrow().clone())
        }

        fn default_domain(&self, token: &str) -> std::result::Result<String, RemoteError> {
            self.record("default_domain".to_string());
            self.check_token(token)?;
            self.default_domain
                .clone()
                .ok_or_else(|| RemoteError::Transport("timed out".to_string()))
        }

        fn get_app(
            &self,
            token: &str,
            name: &str,
            domain: &str,
        ) -> std::result::Result<AppHandle, RemoteError> {
            self.record(format!("get_app:{token}:{name}@{domain}"));
            self.check_token(token)?;
            self.apps
                .borrow()
                .iter()
                .find(|a| a.name == name && a.domain == domain)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(name.to_string()))
        }

        fn create_app(
            &self,
            token: &str,
            name: &str,
            domain: &str,
            cartridge: &str,
        ) -> std::result::Result<AppHandle, RemoteError> {
            self.record(format!("create_app:{name}@{domain}:{cartridge}"));
            self.check_token(token)?;
            if self.fail_create {
                return Err(RemoteError::Status {
                    code: 500,
                    message: "quota exceeded".to_string(),
                });
            }
            let created = app(name, domain);
            self.apps.borrow_mut().push(created.clone());
            Ok(created)
        }

        fn push(&self, app: &AppHandle) -> std::result::Result<String, RemoteError> {
            self.record(format!("push:{}", app.name));
            if self.fail_push {
                return Err(RemoteError::Push("rejected".to_string()));
            }
            Ok(app.url.clone())
        }
    }

    fn site(app_name: &str) -> CourseConfig {
        serde_yaml::from_str(&format!(
            "course:\n  name: HFOSS\n  openshift:\n    app_name: {app_name}\n"
        ))
        .unwrap()
    }

    fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    #[test]
    fn configured_existing_app_goes_straight_to_push() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([]);
        let config = site("mysite");

        let mut deployer =
            Deployer::new(&vcs, &store, &platform, &prompter).with_config(Some(&config));
        let outcome = deployer.run(&DeployOptions::default()).unwrap();

        match outcome {
            DeployOutcome::Deployed { app, url, created } => {
                assert_eq!(app.name, "mysite");
                assert_eq!(url, "http://mysite-rit.rhcloud.com/");
                assert!(!created);
            }
            other => panic!("expected deployment, got {other:?}"),
        }
        assert!(prompter.asked().is_empty());
        assert_eq!(platform.called("create_app"), 0);
        assert_eq!(platform.called("authenticate"), 0);
        assert_eq!(
            platform.calls(),
            vec![
                "list_apps:good:*",
                "default_domain",
                "get_app:good:mysite@rit",
                "push:mysite",
            ]
        );
        assert!(store.saved().is_empty());
        assert_eq!(deployer.state(), DeployState::Done);
    }

    #[test]
    fn rejected_token_prompts_once_and_saves_one_token() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("expired");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([text("student@rit.edu"), text("hunter2")]);
        let config = site("mysite");

        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&DeployOptions::default())
            .unwrap();

        assert!(matches!(outcome, DeployOutcome::Deployed { .. }));
        assert_eq!(prompter.asked(), vec![USERNAME_PROMPT, PASSWORD_PROMPT]);
        assert_eq!(store.saved(), vec!["fresh".to_string()]);
        assert_eq!(platform.called("authenticate:student@rit.edu"), 1);
        // Nothing after the probe uses the rejected token.
        let calls = platform.calls();
        assert!(calls[1..].iter().all(|c| !c.contains("expired")));
        assert!(calls.contains(&"get_app:fresh:mysite@rit".to_string()));
    }

    #[test]
    fn missing_token_with_user_override_only_asks_for_password() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::new();
        let platform = FakePlatform::default();
        let prompter = Scripted::new([text("hunter2")]);

        let opts = DeployOptions {
            app: Some("mysite".to_string()),
            user: Some("prof".to_string()),
            domain: None,
        };
        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&opts)
            .unwrap();

        assert!(matches!(outcome, DeployOutcome::Deployed { .. }));
        assert_eq!(prompter.asked(), vec![PASSWORD_PROMPT]);
        assert_eq!(platform.called("list_apps"), 0);
        assert_eq!(platform.called("authenticate:prof"), 1);
        assert_eq!(store.saved().len(), 1);
    }

    #[test]
    fn failed_reauthentication_is_fatal() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("expired");
        let platform = FakePlatform {
            issued_token: None,
            ..Default::default()
        };
        let prompter = Scripted::new([text("u"), text("wrong")]);

        let mut deployer = Deployer::new(&vcs, &store, &platform, &prompter);
        let err = deployer.run(&DeployOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            DeployError::Authentication(RemoteError::Unauthorized)
        ));
        assert!(store.saved().is_empty());
        assert_eq!(platform.called("authenticate"), 1);
        assert_eq!(platform.called("push"), 0);
        assert_eq!(deployer.state(), DeployState::ResolveCredentials);
    }

    #[test]
    fn dirty_copy_declined_is_cancelled_before_any_remote_call() {
        let vcs = FakeVcs { dirty: true };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(false)]);

        let mut deployer = Deployer::new(&vcs, &store, &platform, &prompter);
        let outcome = deployer.run(&DeployOptions::default()).unwrap();

        assert_eq!(outcome, DeployOutcome::Cancelled(Cancelled::UncommittedChanges));
        assert!(platform.calls().is_empty());
        assert_eq!(deployer.state(), DeployState::Aborted);
    }

    #[test]
    fn dirty_copy_accepted_continues() {
        let vcs = FakeVcs { dirty: true };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(true)]);
        let config = site("mysite");

        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&DeployOptions::default())
            .unwrap();

        assert!(matches!(outcome, DeployOutcome::Deployed { .. }));
        assert_eq!(prompter.asked(), vec![DIRTY_PROMPT]);
    }

    #[test]
    fn missing_app_declined_never_pushes() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(false)]);
        let config = site("newsite");

        let mut deployer =
            Deployer::new(&vcs, &store, &platform, &prompter).with_config(Some(&config));
        let outcome = deployer.run(&DeployOptions::default()).unwrap();

        assert_eq!(
            outcome,
            DeployOutcome::Cancelled(Cancelled::AppNotCreated {
                app: Some("newsite".to_string())
            })
        );
        assert_eq!(platform.called("create_app"), 0);
        assert_eq!(platform.called("push"), 0);
        assert!(prompter.asked()[0].contains("newsite could not be found"));
        assert_eq!(deployer.state(), DeployState::Aborted);
    }

    #[test]
    fn missing_app_confirmed_is_created_then_pushed() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(true)]);

        let opts = DeployOptions {
            app: Some("newsite".to_string()),
            domain: Some("cs".to_string()),
            ..Default::default()
        };
        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&opts)
            .unwrap();

        match outcome {
            DeployOutcome::Deployed { app, created, .. } => {
                assert_eq!(app.name, "newsite");
                assert_eq!(app.domain, "cs");
                assert!(created);
            }
            other => panic!("expected deployment, got {other:?}"),
        }
        assert_eq!(
            platform.calls(),
            vec![
                "list_apps:good:cs",
                "get_app:good:newsite@cs",
                "create_app:newsite@cs:python-2.7",
                "push:newsite",
            ]
        );
    }

    #[test]
    fn failed_creation_is_fatal_and_skips_push() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform {
            fail_create: true,
            ..Default::default()
        };
        let prompter = Scripted::new([Answer::Confirm(true)]);
        let opts = DeployOptions {
            app: Some("newsite".to_string()),
            ..Default::default()
        };

        let err = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&opts)
            .unwrap_err();
        assert!(matches!(err, DeployError::CreateApp { ref app, .. } if app == "newsite"));
        assert_eq!(platform.called("push"), 0);
    }

    #[test]
    fn unresolved_app_name_asks_for_one_on_creation() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(true), text("course2026")]);

        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&DeployOptions::default())
            .unwrap();

        assert!(matches!(outcome, DeployOutcome::Deployed { ref app, .. } if app.name == "course2026"));
        assert_eq!(platform.called("get_app"), 0);
        assert_eq!(prompter.asked()[1], NEW_APP_NAME_PROMPT);
    }

    #[test]
    fn invalid_new_app_name_is_rejected_before_creation() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(true), text("Bad Name")]);

        let err = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&DeployOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::Local(OfcourseError::InvalidAppName(_))
        ));
        assert_eq!(platform.called("create_app"), 0);
    }

    #[test]
    fn app_override_beats_config() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        platform.apps.borrow_mut().push(app("other", "rit"));
        let prompter = Scripted::new([]);
        let config = site("mysite");

        let opts = DeployOptions {
            app: Some("other".to_string()),
            ..Default::default()
        };
        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&opts)
            .unwrap();
        assert!(matches!(outcome, DeployOutcome::Deployed { ref app, .. } if app.name == "other"));
    }

    #[test]
    fn config_domain_skips_default_domain_lookup() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([]);
        let config: CourseConfig = serde_yaml::from_str(
            "course:\n  name: X\n  openshift:\n    app_name: mysite\n    domain: rit\n",
        )
        .unwrap();

        Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&DeployOptions::default())
            .unwrap();
        assert_eq!(platform.called("default_domain"), 0);
        assert_eq!(platform.called("list_apps:good:rit"), 1);
    }

    #[test]
    fn site_yaml_without_course_name_still_supplies_app() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([]);
        let config: CourseConfig =
            serde_yaml::from_str("course:\n  openshift:\n    app_name: mysite\n").unwrap();

        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&DeployOptions::default())
            .unwrap();
        assert!(matches!(outcome, DeployOutcome::Deployed { ref app, .. } if app.name == "mysite"));
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn site_yaml_without_course_key_defers_to_overrides() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([]);
        let config: CourseConfig = serde_yaml::from_str("title: My Course\n").unwrap();

        let opts = DeployOptions {
            app: Some("mysite".to_string()),
            domain: Some("rit".to_string()),
            ..Default::default()
        };
        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&opts)
            .unwrap();
        assert!(matches!(outcome, DeployOutcome::Deployed { .. }));
        assert_eq!(platform.called("default_domain"), 0);
    }

    #[test]
    fn site_yaml_without_course_key_leaves_app_unresolved() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform::default();
        let prompter = Scripted::new([Answer::Confirm(false)]);
        let config: CourseConfig = serde_yaml::from_str("title: My Course\n").unwrap();

        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .with_config(Some(&config))
            .run(&DeployOptions::default())
            .unwrap();
        assert_eq!(
            outcome,
            DeployOutcome::Cancelled(Cancelled::AppNotCreated { app: None })
        );
        assert_eq!(platform.called("get_app"), 0);
        assert_eq!(platform.called("push"), 0);
    }

    #[test]
    fn default_domain_failure_is_fatal() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform {
            default_domain: None,
            ..Default::default()
        };
        let prompter = Scripted::new([]);

        let err = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&DeployOptions::default())
            .unwrap_err();
        assert!(matches!(err, DeployError::Domain(RemoteError::Transport(_))));
    }

    #[test]
    fn push_failure_is_surfaced_without_retry() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::with_token("good");
        let platform = FakePlatform {
            fail_push: true,
            ..Default::default()
        };
        let prompter = Scripted::new([]);
        let config = site("mysite");

        let mut deployer =
            Deployer::new(&vcs, &store, &platform, &prompter).with_config(Some(&config));
        let err = deployer.run(&DeployOptions::default()).unwrap_err();

        assert!(matches!(err, DeployError::Push { .. }));
        assert_eq!(platform.called("push"), 1);
        assert_eq!(deployer.state(), DeployState::Push);
    }

    #[test]
    fn token_refreshed_before_cancellation_stays_saved() {
        let vcs = FakeVcs { dirty: false };
        let store = MemoryCredentialStore::new();
        let platform = FakePlatform::default();
        let prompter = Scripted::new([text("u"), text("p"), Answer::Confirm(false)]);
        let opts = DeployOptions {
            app: Some("ghost".to_string()),
            ..Default::default()
        };

        let outcome = Deployer::new(&vcs, &store, &platform, &prompter)
            .run(&opts)
            .unwrap();
        assert!(matches!(outcome, DeployOutcome::Cancelled(_)));
        assert_eq!(store.load().unwrap().as_deref(), Some("fresh"));
    }
}
