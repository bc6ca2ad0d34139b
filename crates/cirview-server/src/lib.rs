mod server;

pub use server::router;

use cirview_context::config::ViewerConfig;

pub async fn start(config: ViewerConfig) -> anyhow::Result<()> {
    server::run(config).await
}
