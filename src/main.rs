use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::time;

use sshpick::{
    App, AppError, AppEvent, ChooserOutcome, ChooserSession, ConfigManager, EventSink, Result,
    SelectionMode, init_panic_hook, init_tracing,
};

#[derive(Parser, Debug)]
#[command(
    name = "sshpick",
    about = "Pick files across the local machine and SSH connections"
)]
struct Args {
    /// Selection mode: single, multi, dir, any, all
    #[arg(long, default_value = "multi")]
    mode: String,

    /// Initial directory to browse after opening a connection
    #[arg(long)]
    path: Option<String>,

    /// Log level for sshpick.log (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Alternative config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_mode(raw: &str) -> Result<SelectionMode> {
    match raw {
        "single" => Ok(SelectionMode::SingleFile),
        "multi" => Ok(SelectionMode::MultipleFiles),
        "dir" => Ok(SelectionMode::Directory),
        "any" => Ok(SelectionMode::Any),
        "all" => Ok(SelectionMode::All),
        other => Err(AppError::ValidationError(format!(
            "Unknown selection mode '{other}'"
        ))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mode = parse_mode(&args.mode)?;

    init_tracing(&args.log_level)?;
    init_panic_hook();

    let config = match &args.config {
        Some(path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };

    // async event channel
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    let session = Arc::new(ChooserSession::with_sink(
        mode,
        Arc::new(EventSink::new(tx.clone())),
    ));

    // Capture the session outcome for printing once the TUI is gone
    let outcome: Arc<Mutex<Option<ChooserOutcome>>> = Arc::new(Mutex::new(None));
    let captured = Arc::clone(&outcome);
    session
        .on_finish(move |result| {
            if let Ok(mut slot) = captured.lock() {
                *slot = Some(result);
            }
        })
        .await;

    let backend = CrosstermBackend::new(std::io::stdout());
    let terminal = Terminal::new(backend)?;
    let mut app = App::new(terminal, config, Arc::clone(&session), args.path);
    app.init_terminal()?;

    // keyboard/terminal event listening
    let tx_input = tx.clone();
    let mut event_stream = EventStream::new();
    tokio::spawn(async move {
        while let Some(Ok(ev)) = event_stream.next().await {
            if tx_input.send(AppEvent::Input(ev)).await.is_err() {
                break;
            }
        }
    });

    // ticker driving busy-popup refresh and handshake completion handling
    let tx_tick = tx.clone();
    tokio::spawn(async move {
        let mut ticker = time::interval(time::Duration::from_millis(250));
        loop {
            ticker.tick().await;
            if tx_tick.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    let run_result = app.run(&mut rx).await;
    drop(app); // restores the terminal
    run_result?;

    let outcome = outcome.lock().ok().and_then(|mut slot| slot.take());
    match outcome {
        Some(ChooserOutcome::Confirmed(files)) => {
            for file in &files {
                println!("{}\t{}", file.connection_id, file.path);
            }
            Ok(())
        }
        _ => {
            // Cancelled: print nothing, signal "no choice made"
            std::process::exit(1);
        }
    }
}
