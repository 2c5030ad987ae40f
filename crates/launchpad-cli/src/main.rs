#[tokio::main]
async fn main() {
    let code = launchpad_cli::run().await;
    std::process::exit(code);
}
