// Entry point when running `cargo run -p web-server`: serves on the configured
// address. The `farmstead` binary offers the same through `farmstead serve`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_config()?;
    let _guard = configuration::init_tracing(&settings.logging)?;

    let addr = settings.server.socket_addr()?;
    let state = web_server::AppState::connect(&settings).await?;
    web_server::run_server(addr, state).await
}
