#[tokio::main]
async fn main() {
    if let Err(e) = dashboard_client::run_with_config().await {
        tracing::error!(error = %e, "dashboard client failed");
        std::process::exit(1);
    }
}
