#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hanzi_quiz::run().await
}
