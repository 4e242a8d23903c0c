//! agri-chat: terminal front-end for the agricultural assistant
//!
//! Reads questions and commands from stdin and prints session updates as
//! they arrive. Questions run in the background so answers already on
//! screen stay interactive while one is pending.

use agri_chat::command::{self, Command};
use agri_chat::render;
use agri_chat::{
    ClientConfig, ConversationSession, HttpBackend, LoggingService, ProductionSession,
    SessionUpdate, TransitionError,
};
use crossterm::style::Stylize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ClientConfig::from_env()?;
    tracing::info!(
        api_url = %config.api_url,
        feedback_url = %config.feedback_url,
        k = config.source_count,
        "Configuration loaded"
    );

    let backend = HttpBackend::new(&config)?;
    let session_id = uuid::Uuid::new_v4().to_string();
    let session: Arc<ProductionSession> = Arc::new(ConversationSession::new(
        config.session_context(session_id),
        LoggingService::new(backend.clone()),
        LoggingService::new(backend),
    ));

    tokio::spawn(print_updates(Arc::clone(&session)));
    tokio::spawn(print_notifications(Arc::clone(&session)));

    println!("{}", render::welcome());
    println!("{}", "Type /help for commands.".dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => handle(&session, command),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }

    Ok(())
}

fn handle(session: &Arc<ProductionSession>, command: Command) {
    match command {
        Command::Ask(text) => {
            let session = Arc::clone(session);
            tokio::spawn(async move {
                match session.submit(&text).await {
                    Ok(_) | Err(TransitionError::BlankQuestion) => {}
                    Err(e) => println!("{}", e.to_string().yellow()),
                }
            });
        }
        Command::ToggleSources(turn) => {
            if let Err(e) = session.toggle_evidence(turn) {
                println!("{}", e.to_string().yellow());
            }
        }
        Command::Rate {
            turn,
            rating,
            comment,
        } => {
            if let Err(e) = session.rate(turn, rating, comment) {
                println!("{}", e.to_string().yellow());
            }
        }
        Command::Dismiss => session.dismiss_notification(),
        Command::Help => println!("{}", render::help()),
        Command::Quit => {}
    }
}

async fn print_updates(session: Arc<ProductionSession>) {
    let mut updates = session.subscribe();
    loop {
        let update = match updates.recv().await {
            Ok(update) => update,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind session updates");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match update {
            SessionUpdate::TurnAppended(turn) => {
                print!(
                    "{}",
                    render::turn(&turn, session.is_disclosed(turn.id()), session.feedback(turn.id()))
                );
            }
            SessionUpdate::BusyChanged(true) => println!("{}", render::busy()),
            SessionUpdate::BusyChanged(false) => {}
            SessionUpdate::DisclosureChanged { turn, .. }
            | SessionUpdate::FeedbackRecorded { turn, .. } => {
                if let Some(current) = session.turn(turn) {
                    print!(
                        "{}",
                        render::turn(&current, session.is_disclosed(turn), session.feedback(turn))
                    );
                }
            }
        }
    }
}

async fn print_notifications(session: Arc<ProductionSession>) {
    let mut notices = session.subscribe_notifications();
    while notices.changed().await.is_ok() {
        let current = notices.borrow_and_update().clone();
        if let Some(notice) = current {
            println!("{}", render::notification(&notice));
        }
    }
}
