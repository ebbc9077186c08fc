#[tokio::main]
async fn main() {
    std::process::exit(sprinkler::app::startup::startup().await);
}
