use axum::extract::ConnectInfo;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::time::Duration;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(300);

/// Spawns the liveness responder and the heartbeat log, both independent
/// of the gateway tasks. Binding failures are logged, not fatal.
pub fn spawn(port: u16) {
    tokio::spawn(serve(port));
    tokio::spawn(heartbeat());
}

async fn serve(port: u16) {
    let app = Router::new()
        .route("/", get(home))
        .route("/status", get(status))
        .route("/ping", get(ping));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            log::info!("Keep-alive server listening on {}", addr);
            if let Err(e) = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                log::error!("Keep-alive server failed: {}", e);
            }
        }
        Err(e) => log::error!("Failed to bind keep-alive server on {}: {}", addr, e),
    }
}

async fn home(ConnectInfo(addr): ConnectInfo<SocketAddr>) -> &'static str {
    log::info!("Home page visited from {}", addr);
    "🚨 Alerte Percepteur Bot is running! 🚨"
}

async fn status(ConnectInfo(addr): ConnectInfo<SocketAddr>) -> Json<serde_json::Value> {
    log::info!("Status checked from {}", addr);
    Json(serde_json::json!({
        "status": "online",
        "bot": "Alerte Percepteur",
        "message": "Bot Discord opérationnel",
    }))
}

async fn ping(ConnectInfo(addr): ConnectInfo<SocketAddr>, headers: HeaderMap) -> &'static str {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("Unknown");
    log::info!("Ping ({}) from {}", probe_source(user_agent), addr);
    "pong"
}

/// Classifies who is polling us, for the logs only.
fn probe_source(user_agent: &str) -> &'static str {
    let user_agent = user_agent.to_lowercase();
    if user_agent.contains("cron-job.org") {
        "cron-job"
    } else if user_agent.contains("github-actions") {
        "github-actions"
    } else if user_agent.contains("uptimerobot") {
        "uptimerobot"
    } else {
        "external"
    }
}

async fn heartbeat() {
    let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        log::info!("Keep alive ping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_sources_are_classified_by_user_agent() {
        assert_eq!(probe_source("Mozilla/5.0 (compatible; Cron-Job.org)"), "cron-job");
        assert_eq!(probe_source("GitHub-Actions runner"), "github-actions");
        assert_eq!(probe_source("UptimeRobot/2.0"), "uptimerobot");
        assert_eq!(probe_source("curl/8.0"), "external");
        assert_eq!(probe_source("Unknown"), "external");
    }
}
