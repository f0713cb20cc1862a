use dotenvy::dotenv;
use tracing::{error, info};

use activity_signup::{app, config::Config, logging};

#[tokio::main]
async fn main() {
    // .env is optional
    dotenv().ok();

    logging::init();
    info!(
        "Starting activity-signup (build {})",
        env!("ACTIVITY_SIGNUP_BUILD_ID")
    );

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
