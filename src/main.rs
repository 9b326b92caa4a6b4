use rask_trace_stats::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::main().await
}
