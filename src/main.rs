#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = ode_cli::run().await {
        std::process::exit(ode_cli::report(&e));
    }
}
