//! `addrbook` - CLI for the address book
//!
//! This binary hosts the address book pages on the command line: each command
//! opens a page, feeds it the matching user action, and prints what the page
//! shows.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, StdinLock, Stdout};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use addressbook::cli::{
    contact_id, list_page, Cli, Command, ConfigCommand, Confirmation, ConsolePresenter,
    EmergencyCommand, OutputFormat, ThemeCommand,
};
use addressbook::controller::{Event, ModalState, NotificationKind};
use addressbook::{
    init_logging, Config, Controller, Element, Host, Outcome, Page, Settings, SharedStore,
    SqliteStore, Surface,
};

type Console = ConsolePresenter<Stdout, StdinLock<'static>>;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    if let Command::Config(config_cmd) = cli.command {
        handle_config(&config, config_cmd)?;
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(&config, cli.command))
}

/// Everything needed to open a page.
#[derive(Debug)]
struct Session {
    store: SharedStore,
    settings: Settings,
}

impl Session {
    fn open(config: &Config) -> anyhow::Result<Self> {
        let path = config.database_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        debug!(path = %store.path().display(), "Opened store");
        Ok(Self {
            store: Rc::new(store),
            settings: Settings::from_config(config)?,
        })
    }

    fn controller(&self, page: Page, surface: Surface) -> Controller {
        Controller::new(&self.store, page, surface, self.settings.clone())
    }

    fn host(&self, controller: Controller, format: OutputFormat, yes: bool) -> Host<Console> {
        let confirmation = if yes {
            Confirmation::AssumeYes
        } else {
            Confirmation::Ask(io::stdin().lock())
        };
        Host::new(
            controller,
            ConsolePresenter::new(format, io::stdout(), confirmation),
        )
    }

    async fn page(
        &self,
        page: Page,
        format: OutputFormat,
        events: impl IntoIterator<Item = Event>,
    ) -> anyhow::Result<Outcome> {
        let controller = self.controller(page, Surface::for_page(page));
        let mut host = self.host(controller, format, true);
        Ok(host.run(events).await?)
    }

    async fn delete(&self, page: Page, id: &str, yes: bool) -> anyhow::Result<Outcome> {
        let id = contact_id(id);
        let controller =
            self.controller(page, Surface::for_page(page).without(Element::ContactsList));
        if controller.book().get(&id).is_none() && controller.emergency_book().get(&id).is_none()
        {
            bail!("no contact with id {id}");
        }

        let event = Event::RequestDelete {
            id,
            from_modal: false,
        };
        let mut host = self.host(controller, OutputFormat::Plain, yes);
        Ok(host.run([event]).await?)
    }
}

fn exit_code(outcome: &Outcome) -> ExitCode {
    match &outcome.last_notification {
        Some(notification) if notification.kind == NotificationKind::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

async fn run(config: &Config, command: Command) -> anyhow::Result<ExitCode> {
    let session = Session::open(config)?;

    let outcome = match command {
        Command::Add(cmd) => {
            session
                .page(
                    Page::AddContact,
                    OutputFormat::Plain,
                    [Event::SubmitContact(cmd.draft())],
                )
                .await?
        }
        Command::List(cmd) => session.page(list_page(cmd.emergency), cmd.format, []).await?,
        Command::Search(cmd) => {
            let page = list_page(cmd.emergency);
            let controller = session
                .controller(page, Surface::for_page(page))
                .with_query(cmd.query);
            let mut host = session.host(controller, cmd.format, true);
            host.run([]).await?
        }
        Command::Show(cmd) => {
            let page = list_page(cmd.emergency);
            let id = contact_id(&cmd.id);
            let controller =
                session.controller(page, Surface::for_page(page).without(Element::ContactsList));
            let mut host = session.host(controller, cmd.format, true);
            let outcome = host.run([Event::View(id.clone())]).await?;
            if *host.controller().modal() == ModalState::Closed {
                bail!("no contact with id {id}");
            }
            outcome
        }
        Command::Delete(cmd) => {
            session
                .delete(list_page(cmd.emergency), &cmd.id, cmd.yes)
                .await?
        }
        Command::Emergency(EmergencyCommand::Add { name, phone }) => {
            session
                .page(
                    Page::AddEmergency,
                    OutputFormat::Plain,
                    [Event::SubmitEmergency { name, phone }],
                )
                .await?
        }
        Command::Emergency(EmergencyCommand::List { format }) => {
            session.page(Page::EmergencyContacts, format, []).await?
        }
        Command::Emergency(EmergencyCommand::Delete { id, yes }) => {
            session.delete(Page::EmergencyContacts, &id, yes).await?
        }
        Command::Theme(theme_cmd) => {
            let page = Page::ViewContacts;
            let controller =
                session.controller(page, Surface::for_page(page).without(Element::ContactsList));
            let mut host = session.host(controller, OutputFormat::Plain, true);
            let events = match theme_cmd {
                ThemeCommand::Show => Vec::new(),
                ThemeCommand::Toggle => vec![Event::ToggleTheme],
            };
            let outcome = host.run(events).await?;
            println!("Theme: {}", host.controller().theme());
            outcome
        }
        Command::Config(_) => unreachable!("handled before the runtime starts"),
    };

    Ok(exit_code(&outcome))
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[UI]");
                println!("  Loading delay (ms): {}", config.ui.loading_delay_ms);
                println!("  Save delay (ms):    {}", config.ui.save_delay_ms);
                println!("  Redirect delay (ms): {}", config.ui.redirect_delay_ms);
                println!("  Notification (ms):  {}", config.ui.notification_ms);
                println!("  Default theme:      {}", config.ui.default_theme);
                println!();
                println!("[Validation]");
                println!("  Phone pattern:      {}", config.validation.phone_pattern);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
