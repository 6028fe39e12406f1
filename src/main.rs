#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = classwork_rust::run().await {
        eprintln!("classwork-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
