#[tokio::main]
async fn main() -> anyhow::Result<()> {
    edgecoach_server::start().await
}
