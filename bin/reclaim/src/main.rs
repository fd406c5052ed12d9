#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    reclaim::run().await
}
