mod telemetry;

use nudge_core::NotificationEngine;
use nudge_domain::ID;
use nudge_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("nudge_agent".into(), "info".into());
    init_subscriber(subscriber);

    run_migration().await.expect("To run migrations");

    let context = setup_context().await;

    let user_id = std::env::var("NUDGE_USER_ID")
        .expect("NUDGE_USER_ID env var to be present.")
        .parse::<ID>()
        .expect("NUDGE_USER_ID to be a valid id");

    let engine = NotificationEngine::new(context, user_id);
    if let Err(e) = engine.register_token().await {
        tracing::warn!("Token registration failed: {:?}", e);
    }
    engine.start();
    info!("Notification agent started for user {}", user_id);

    tokio::signal::ctrl_c().await
}
