mod cli;

#[tokio::main]
async fn main() {
    webpushkit::logging::init("info");
    let code = cli::run().await;
    std::process::exit(code);
}
