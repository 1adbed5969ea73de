use serde_json::Value;
use tokio::signal;

use hmi_navigation_rpc::{
    Client, ConnectionMeta, Navigation, NavigationModel, Result, RpcObserver, TbtState,
    COMPONENT_NAME,
};

struct LoggingModel;

impl NavigationModel for LoggingModel {
    fn tbt_activate(&mut self, params: &Value) {
        tracing::info!(%params, "show constant tbt");
    }

    fn tbt_turn_list_update(&mut self, params: &Value) {
        tracing::info!(%params, "update turn list");
    }

    fn on_navigation_alert_maneuver(&mut self, params: &Value) {
        tracing::info!(%params, "alert maneuver");
    }

    fn start_stream(&mut self, params: &Value) {
        tracing::info!(%params, "start stream");
    }

    fn stop_stream(&mut self, params: &Value) {
        tracing::info!(%params, "stop stream");
    }

    fn on_stop_stream(&mut self, params: &Value) {
        tracing::info!(%params, "stream stopped by core");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let client = Client::new(ConnectionMeta::new("ws://127.0.0.1:8087", COMPONENT_NAME));
    let mut navigation = Navigation::new(LoggingModel, client);
    navigation.set_ready(true);
    let mut events = navigation.connect().await?;

    println!("waiting for ctrl-c");
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                navigation.on_tbt_client_state(TbtState::RouteCancelled, navigation.app_id());
                navigation.disconnect();
                break;
            }
            event = events.recv() => {
                match event {
                    Some(event) => navigation.dispatch(event),
                    None => break,
                }
            }
        }
    }

    // drain the unregister/disconnect events
    navigation.run(events).await;
    Ok(())
}
