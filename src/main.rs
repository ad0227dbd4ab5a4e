#[tokio::main]
async fn main() {
    if let Err(error) = glimpse_lib::run().await {
        eprintln!("glimpse failed: {error}");
        std::process::exit(1);
    }
}
