//! Terminal client for the article chat service.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use articlechat_core::config::ClientConfig;
use articlechat_core::params::{ParamField, new_session_id};
use articlechat_core::text::preview_text;
use articlechat_engine::controller::{SkipReason, SubmitOutcome, TurnController, TurnState};
use articlechat_runtime::config_store::ConfigStore;
use articlechat_runtime::defaults::{base_url_override, default_config_path, fallback_config_path};
use articlechat_runtime::health::{HealthStatus, check_health};
use articlechat_runtime::session::build_controller;

mod render;
mod repl;

use repl::{HELP, ReplCommand, parse_line};

/// Ask questions about an article through the chat service.
#[derive(Debug, Parser)]
#[command(name = "articlechat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Configuration file path.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chat service base URL (overrides config and ARTICLECHAT_BASE_URL).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Enable verbose logging (can be repeated: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start an interactive chat (the default).
    Chat(ChatArgs),

    /// Check whether the chat service is up.
    Health,

    /// Write a config file with default settings.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Default, Args)]
struct ChatArgs {
    /// User email sent with every question.
    #[arg(long)]
    email: Option<String>,

    /// Session id sent with every question.
    #[arg(long)]
    session: Option<String>,

    /// Article the questions are about.
    #[arg(long)]
    article: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    let mut builder = pretty_env_logger::formatted_builder();
    builder.parse_filters(&filters);
    let _ = builder.try_init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let store = ConfigStore::at_path(
        cli.config
            .clone()
            .or_else(default_config_path)
            .unwrap_or_else(fallback_config_path),
    );
    let mut cfg = store.load_or_default()?;
    if let Some(url) = base_url_override() {
        cfg.base_url = url;
    }
    if let Some(url) = cli.base_url.clone() {
        cfg.base_url = url;
    }

    match cli.command {
        None => run_chat(cfg, ChatArgs::default()).await,
        Some(Command::Chat(args)) => run_chat(cfg, args).await,
        Some(Command::Health) => run_health(&cfg).await,
        Some(Command::InitConfig { force }) => {
            if store.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                );
            }
            store.save(&cfg)?;
            println!("wrote {}", store.path().display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_health(cfg: &ClientConfig) -> anyhow::Result<ExitCode> {
    let status = check_health(cfg).await;
    println!("{}", describe_health(&status));
    Ok(if status.is_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn describe_health(status: &HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "chat service is healthy".into(),
        HealthStatus::Unhealthy(why) => format!("chat service is unhealthy: {why}"),
        HealthStatus::Unreachable(why) => format!("chat service is unreachable: {why}"),
    }
}

async fn run_chat(mut cfg: ClientConfig, args: ChatArgs) -> anyhow::Result<ExitCode> {
    if let Some(v) = args.email {
        cfg.defaults.user_email = v;
    }
    if let Some(v) = args.session {
        cfg.defaults.session_id = v;
    }
    if let Some(v) = args.article {
        cfg.defaults.article_reference = v;
    }

    let controller = Arc::new(build_controller(&cfg));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<JoinHandle<SubmitOutcome>> = None;

    println!("Connected to {}. Type :help for commands.", cfg.base_url);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    ReplCommand::Quit => break,
                    ReplCommand::Health => println!("{}", describe_health(&check_health(&cfg).await)),
                    cmd => handle_command(&controller, cmd, &mut pending),
                }
            }
            outcome = join_pending(&mut pending) => {
                pending = None;
                match outcome {
                    Ok(SubmitOutcome::Completed(entry)) => println!("{}", render::format_entry(&entry)),
                    Ok(SubmitOutcome::Skipped(SkipReason::EmptyQuestion)) => println!("(nothing to send)"),
                    Ok(SubmitOutcome::Skipped(SkipReason::InFlight)) => println!("(still waiting on the previous answer)"),
                    Err(e) => log::error!("chat turn task ended abnormally: {e}"),
                }
            }
        }
    }

    // Let an outstanding turn finish so its answer isn't lost.
    if let Some(handle) = pending {
        if let Ok(SubmitOutcome::Completed(entry)) = handle.await {
            println!("{}", render::format_entry(&entry));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Applies one REPL command. A command that starts a turn fills `pending`; at most one turn
/// is ever pending, and a question typed while it runs is dropped rather than queued.
fn handle_command(
    controller: &Arc<TurnController>,
    cmd: ReplCommand,
    pending: &mut Option<JoinHandle<SubmitOutcome>>,
) {
    match cmd {
        ReplCommand::Ask(question) => {
            if turn_pending(controller, pending) {
                println!(
                    "(still waiting on the previous answer; {:?} was not sent)",
                    preview_text(&question)
                );
                return;
            }
            controller.update_parameter(ParamField::Question, question);
            *pending = Some(start_turn(controller));
        }
        ReplCommand::Send => {
            if turn_pending(controller, pending) {
                println!("(still waiting on the previous answer)");
                return;
            }
            *pending = Some(start_turn(controller));
        }
        ReplCommand::Set(field, value) => controller.update_parameter(field, value),
        ReplCommand::NewSession => {
            let id = new_session_id();
            println!("session: {id}");
            controller.update_parameter(ParamField::SessionId, id);
        }
        ReplCommand::Show => println!(
            "{}",
            render::format_params(&controller.params(), controller.is_in_flight())
        ),
        ReplCommand::History => {
            let view = controller.transcript().all();
            if view.is_empty() {
                println!("No messages yet. Start a conversation!");
            }
            for entry in &view {
                println!("{}", render::format_entry(&entry));
            }
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Invalid(msg) => println!("{msg}"),
        ReplCommand::Empty | ReplCommand::Quit | ReplCommand::Health => {}
    }
}

/// A spawned turn counts as pending until its handle is joined, even before it reaches the gate.
fn turn_pending(
    controller: &TurnController,
    pending: &Option<JoinHandle<SubmitOutcome>>,
) -> bool {
    pending.is_some() || controller.is_in_flight()
}

fn start_turn(controller: &Arc<TurnController>) -> JoinHandle<SubmitOutcome> {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller
            .submit_with_hook(|state| async move {
                if state == TurnState::Submitting {
                    println!("(thinking…)");
                }
            })
            .await
    })
}

async fn join_pending(
    pending: &mut Option<JoinHandle<SubmitOutcome>>,
) -> Result<SubmitOutcome, tokio::task::JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use articlechat_core::params::{ChatRequest, RequestParams};
    use articlechat_engine::controller::TurnPolicy;
    use articlechat_engine::traits::ChatEndpoint;
    use articlechat_engine::transcript::Transcript;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Records every question it receives and holds the answer until released.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
        started: Notify,
        release: Notify,
    }

    #[async_trait::async_trait]
    impl ChatEndpoint for Recording {
        async fn send(&self, request: &ChatRequest) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(request.user_question.clone());
            self.started.notify_one();
            self.release.notified().await;
            Ok(format!("re: {}", request.user_question))
        }
    }

    fn controller(endpoint: Arc<Recording>) -> Arc<TurnController> {
        Arc::new(TurnController::new(
            endpoint,
            Transcript::new(),
            RequestParams::default(),
            TurnPolicy::default(),
        ))
    }

    #[tokio::test]
    async fn back_to_back_questions_start_a_single_turn() {
        let endpoint = Arc::new(Recording::default());
        let c = controller(endpoint.clone());
        let mut pending = None;

        // The second line arrives before the first turn has reached the gate.
        handle_command(&c, ReplCommand::Ask("A".into()), &mut pending);
        handle_command(&c, ReplCommand::Ask("B".into()), &mut pending);
        let handle = pending.take().expect("first question starts a turn");

        endpoint.started.notified().await;
        endpoint.release.notify_one();
        let out = handle.await.unwrap();

        assert_eq!(out.entry().unwrap().question, "A");
        assert_eq!(*endpoint.seen.lock().unwrap(), vec!["A".to_string()]);
        assert_eq!(c.transcript().len(), 1);
        assert_eq!(c.params().question, "");
    }

    #[tokio::test]
    async fn question_typed_during_a_turn_is_dropped_not_overwritten() {
        let endpoint = Arc::new(Recording::default());
        let c = controller(endpoint.clone());
        let mut pending = None;

        handle_command(&c, ReplCommand::Ask("A".into()), &mut pending);
        endpoint.started.notified().await;
        assert!(c.is_in_flight());

        handle_command(&c, ReplCommand::Ask("B".into()), &mut pending);
        handle_command(&c, ReplCommand::Send, &mut pending);
        assert_eq!(c.params().question, "A");

        endpoint.release.notify_one();
        let out = pending.take().unwrap().await.unwrap();
        assert_eq!(out.entry().unwrap().question, "A");
        assert_eq!(c.transcript().len(), 1);

        // Once the turn is joined the next question goes out normally.
        handle_command(&c, ReplCommand::Ask("C".into()), &mut pending);
        endpoint.started.notified().await;
        endpoint.release.notify_one();
        let out = pending.take().unwrap().await.unwrap();
        assert_eq!(out.entry().unwrap().question, "C");
        assert_eq!(*endpoint.seen.lock().unwrap(), vec!["A".to_string(), "C".to_string()]);
    }
}
