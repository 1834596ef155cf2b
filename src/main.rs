mod alerts;
mod app;
mod command;
mod config;
mod entry;
mod error;
mod keys;
mod pump;
mod storage;
mod ui;

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::alerts::player_for;
use crate::app::{AppOp, Intent, Response, TimersApp};
use crate::command::{parse_line, Input};
use crate::error::AppResult;
use crate::keys::Shortcut;
use crate::storage::TimerStorage;

const APP_NAME: &str = "productivity-timers";

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Concurrent stopwatches and countdown timers with a productivity summary")]
#[command(version)]
struct Cli {
    /// Directory holding timers.json and settings.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace); RUST_LOG wins if set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Redraw a status line for running timers
    #[arg(long)]
    live: bool,

    /// Status line refresh period in milliseconds
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Never play sounds
    #[arg(long)]
    mute: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the saved timer entries and exit
    ListEntries,
}

/// Turns stdin lines into `AppOp::Input`; EOF becomes `AppOp::Quit`.
/// Runs on its own thread so a pending read never holds up shutdown.
fn spawn_input_reader(tx: UnboundedSender<AppOp>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(AppOp::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("stdin read failed: {}", e);
                    break;
                }
            }
        }
        tx.send(AppOp::Quit).ok();
    });
}

fn spawn_redraw(tx: UnboundedSender<AppOp>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if tx.send(AppOp::Redraw).is_err() {
                break;
            }
        }
    });
}

/// Front-end state that lives between lines of input.
#[derive(Default)]
struct Session {
    /// Entry whose new label the next line answers.
    pending_label: Option<u64>,
}

impl Session {
    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, app: &mut TimersApp, line: &str) -> bool {
        if let Some(id) = self.pending_label.take() {
            let label = Some(line.trim().to_string()).filter(|l| !l.is_empty());
            self.dispatch(app, Intent::LabelEdited { id, label });
            return true;
        }

        if line.trim().is_empty() {
            return true;
        }
        if let Some(shortcut) = Shortcut::from_chord(line) {
            self.dispatch(app, shortcut.intent());
            return true;
        }

        match parse_line(line) {
            Ok(Input::Intent(intent)) => self.dispatch(app, intent),
            Ok(Input::List) => print!("{}", ui::draw_board(&app.snapshots())),
            Ok(Input::Summary) => print!("{}", ui::draw_summary(app.aggregator())),
            Ok(Input::Help) => println!("{}", ui::HELP_TEXT),
            Ok(Input::Quit) => return false,
            Err(e) => println!("{}", e.render().to_string().trim_end()),
        }
        true
    }

    fn dispatch(&mut self, app: &mut TimersApp, intent: Intent) {
        match app.handle_intent(intent) {
            Ok(Response::Done) => {}
            Ok(Response::Added(id)) => {
                if let Some(snap) = app.snapshot(id) {
                    println!("Added #{} {}", id, snap.label);
                }
            }
            Ok(Response::LabelPrompt { id, current }) => {
                println!("New label for #{} (currently \"{}\", blank cancels):", id, current);
                self.pending_label = Some(id);
            }
            Ok(Response::Lapped(lap)) => println!("{}", ui::draw_lap(&lap)),
            Ok(Response::Completed(report)) => println!("{}", ui::draw_completion(&report)),
            Err(e) => println!("Error: {}", e),
        }
    }
}

async fn run(cli: Cli, storage: TimerStorage) -> AppResult<()> {
    let stored = storage.load_settings();
    // leave an editable settings file behind on first run
    storage.save_settings(&stored);
    let settings = stored.with_overrides(cli.mute, cli.refresh_ms);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = TimersApp::new(storage, player_for(&settings.alert_config()), tx.clone());

    spawn_input_reader(tx.clone());
    if cli.live {
        spawn_redraw(tx.clone(), Duration::from_millis(settings.refresh_ms));
    }
    drop(tx);

    println!("{} - type `help` for commands", APP_NAME);
    print!("{}", ui::draw_board(&app.snapshots()));

    let mut session = Session::default();
    while let Some(op) = rx.recv().await {
        match op {
            AppOp::Pump { id, generation } => {
                if let Some(report) = app.handle_pump(id, generation) {
                    println!("{}", ui::draw_completion(&report));
                }
            }
            AppOp::Input(line) => {
                if !session.handle_line(&mut app, &line) {
                    break;
                }
            }
            AppOp::Redraw => {
                if app.any_running() {
                    eprintln!("{}", ui::draw_status_line(&app.snapshots()));
                }
            }
            AppOp::Quit => break,
        }
    }

    app.shutdown();
    if !app.aggregator().is_empty() {
        print!("{}", ui::draw_summary(app.aggregator()));
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .format_timestamp_millis()
        .init();
    log::info!("{} starting", APP_NAME);

    let storage = match &cli.data_dir {
        Some(dir) => TimerStorage::new(dir),
        None => TimerStorage::default_location()?,
    };

    match cli.command {
        Some(Commands::ListEntries) => {
            for entry in storage.load_entries() {
                println!(
                    "{}\t{}\t{}\t{}",
                    entry.id,
                    entry.kind.as_str(),
                    entry.label,
                    entry.category()
                );
            }
            Ok(())
        }
        None => run(cli, storage).await,
    }
}
