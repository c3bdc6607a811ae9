#[tokio::main]
async fn main() {
    if let Err(e) = events_backend::run().await {
        eprintln!("events-backend failed to start: {}", e);
        std::process::exit(1);
    }
}
