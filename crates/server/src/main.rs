#[tokio::main]
async fn main() -> anyhow::Result<()> {
    paraflow_server::start().await
}
