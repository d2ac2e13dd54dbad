use anyhow::Context;
use annotation_core::{Principal, Resource, SaveError};
use annotation_editor::{AnnotationEditor, EditorView, SubmitOutcome};
use annotation_shell::local::{
    MemoryClipboard, MemoryStore, StaticAuth, StaticSubscription, StdoutNotifier, TracingAnalytics,
};
use annotation_shell::{AppShell, PageRequest, ShellConfig, ShellServices, SubscriptionStatus};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("annotation-console")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit a table description from the terminal")
        .arg(Arg::new("id").long("id").required(true).help("Resource identifier"))
        .arg(Arg::new("name").long("name").required(true).help("Resource display name"))
        .arg(
            Arg::new("icon")
                .long("icon")
                .default_value("table")
                .help("Icon reference"),
        )
        .arg(
            Arg::new("description")
                .long("description")
                .help("Current description of the resource"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .help("New description; unlocks the editor first if needed"),
        )
        .arg(
            Arg::new("copy-id")
                .long("copy-id")
                .action(ArgAction::SetTrue)
                .help("Copy the resource ID to the clipboard"),
        )
        .arg(
            Arg::new("fail-save")
                .long("fail-save")
                .action(ArgAction::SetTrue)
                .help("Simulate an unavailable annotation store"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a shell configuration TOML file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print notifications and the final view as JSON"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &ArgMatches) -> anyhow::Result<ShellConfig> {
    let Some(path) = args.get_one::<String>("config") else {
        return Ok(ShellConfig::default());
    };
    ShellConfig::load(path).with_context(|| format!("loading config file {path}"))
}

fn print_view(view: &EditorView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }
    println!("{}  ({})", view.title, view.id_line);
    println!("{}: {}", view.label, if view.field_enabled { "unlocked" } else { "locked" });
    println!("  {}", view.draft);
    println!("  {}/{} characters", view.character_count, view.max_length);
    if let Some(message) = &view.validation_message {
        println!("  ! {message}");
    }
    Ok(())
}

async fn run(args: ArgMatches) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;
    let json = args.get_flag("json");

    let principal = Principal::new(
        std::env::var("USER").unwrap_or_else(|_| "console".to_string()),
        "local-session",
    );
    let clipboard = Arc::new(MemoryClipboard::new());
    let shell = AppShell::new(
        config,
        Arc::new(StaticAuth(Some(principal))),
        Arc::new(StaticSubscription(SubscriptionStatus::Active)),
        ShellServices {
            clipboard: clipboard.clone(),
            notifier: Arc::new(StdoutNotifier::new(json)),
            analytics: Arc::new(TracingAnalytics),
        },
    );
    let env = shell
        .bootstrap(&PageRequest::desktop("/databases"))
        .await
        .context("bootstrapping console page")?;

    let mut resource = Resource::new(
        args.get_one::<String>("id").cloned().unwrap_or_default(),
        args.get_one::<String>("name").cloned().unwrap_or_default(),
        args.get_one::<String>("icon").map_or("table", String::as_str),
    );
    resource.description = args.get_one::<String>("description").cloned();

    let store = Arc::new(if args.get_flag("fail-save") {
        MemoryStore::failing(SaveError::Unavailable("simulated outage".to_string()))
    } else {
        MemoryStore::new()
    });
    let host = Arc::new(store.host_for(resource.id.clone()));
    let editor = AnnotationEditor::open(resource, host, env);

    if args.get_flag("copy-id") {
        editor.copy_id().await;
        tracing::debug!(clipboard = ?clipboard.contents(), "clipboard after copy");
    }

    let mut code = ExitCode::SUCCESS;
    if let Some(text) = args.get_one::<String>("input") {
        if editor.is_locked() {
            editor.toggle_lock()?;
        }
        editor.input(text.clone())?;
        match editor.submit().await {
            Ok(SubmitOutcome::Saved) => {
                let id = editor.resource().id;
                tracing::info!(stored = ?store.description(&id), "stored description");
            }
            Ok(SubmitOutcome::Busy) => {}
            Err(err) => {
                tracing::error!("submit failed: {}", err);
                code = ExitCode::FAILURE;
            }
        }
    } else {
        editor.cancel();
    }

    print_view(&editor.view(), json)?;
    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli().get_matches();
    init_tracing(args.get_flag("log-json"));

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
