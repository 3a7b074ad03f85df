// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;

use chatrelay_core::{ChatSession, ChatTransport, RelayClient};
use clap::Parser;
use cli::{Cli, Commands};

mod app;
mod cli;
mod logging;
mod tui;
mod ui;

use app::{Action, App};
use tui::AppEvent;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let args = Cli::parse();

    let command = args.command.unwrap_or(Commands::Chat);
    if command == Commands::Version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let _logger = logging::init(&args.log_file)?;
    let client = RelayClient::new(&args.url, !args.verify_tls)?;
    log::info!("using relay at {}", client.base_url());

    match command {
        Commands::Chat => run_chat(client).await?,
        Commands::Send { message } => {
            let mut session = ChatSession::new(client);
            let reply = session.send(&message).await?;
            println!("{}", reply.content);
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", health.status);
        }
        Commands::Version => {}
    }

    Ok(())
}

async fn run_chat(client: RelayClient) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(client.base_url().as_str());
    let client = Arc::new(client);

    let result = async {
        loop {
            app.sync_scroll();
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            let Some(event) = events.next().await else {
                break;
            };
            match event {
                AppEvent::Key(key) => match app.handle_key(key) {
                    Action::Send(content) => {
                        let client = Arc::clone(&client);
                        let tx = events.sender();
                        tokio::spawn(async move {
                            let outcome = client.send(&content).await;
                            let _ = tx.send(AppEvent::Reply(outcome));
                        });
                    }
                    Action::Quit => break,
                    Action::None => {}
                },
                AppEvent::Reply(outcome) => app.receive(outcome),
                AppEvent::Tick => app.tick(),
                AppEvent::Resize(_, _) => {}
            }
        }
        Ok::<(), Error>(())
    }
    .await;

    tui::restore()?;
    result
}
