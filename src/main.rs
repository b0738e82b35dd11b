//! Immersive client - talk to the characters of a location
//!
//! A terminal front-end over the session state machine. All state lives in
//! the interaction controller; this binary only wires configuration, the
//! agent service and the text renderer together.

mod assets;
mod config;
mod conversation;
mod frontend;
mod location;
mod runtime;
mod state_machine;
mod transport;
mod view;

use assets::AssetTable;
use config::ClientConfig;
use frontend::{parse_command, render_view, Command};
use runtime::{InteractionController, ViewEvent};
use state_machine::SessionContext;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use transport::{HttpAgentService, LoggingAgentService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (stderr, so it stays out of the rendered scene)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "immersive_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = ClientConfig::from_env()?;
    let keys: Vec<&str> = config.catalog.iter().map(|l| l.key.as_str()).collect();
    tracing::info!(
        api_url = %config.api_url,
        player_id = config.player_id,
        locations = ?keys,
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    let http = HttpAgentService::new(&config.api_url, config.timeout)?;
    let service = LoggingAgentService::new(Arc::new(http));

    let context = SessionContext::new(config.player_id, config.catalog);
    let (controller, handle) =
        InteractionController::new(context, service, AssetTable::new(&config.asset_root));

    let views = controller.subscribe();
    let renderer = tokio::spawn(render_loop(views));
    let controller_task = tokio::spawn(controller.run());

    handle.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::ChangeLocation => handle.on_location_change_requested().await?,
            Command::Talk(agent) => handle.on_speaker_clicked(agent).await?,
            Command::Say(text) => handle.on_message_submit(text).await?,
            Command::Invalid(usage) => eprintln!("{usage}"),
        }
    }

    // Dropping the last handle lets the controller drain and stop
    drop(handle);
    controller_task.await?;
    renderer.abort();

    Ok(())
}

async fn render_loop(mut views: broadcast::Receiver<ViewEvent>) {
    loop {
        match views.recv().await {
            Ok(ViewEvent::Render(view)) => println!("{}", render_view(&view)),
            Ok(ViewEvent::Diagnostic { message }) => println!("(!) {message}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Renderer lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
