use anyhow::{Error, Result};
use dispatch_service::{clients::fcm::FcmClient, config::Config, dispatch::Dispatcher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::load()?;
    let fcm_client = FcmClient::new(&config).await?;
    let _dispatcher = Dispatcher::new(fcm_client, &config);

    println!("Configuration validated. Dispatcher is ready to start.");

    Ok(())
}
