#[path = "audits-eval/app/mod.rs"]
mod app;
#[path = "audits-eval/args.rs"]
mod args;
#[path = "audits-eval/config/mod.rs"]
mod config;
#[path = "audits-eval/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
