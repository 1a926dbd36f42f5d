use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zetta::auth::get_or_create_api_key;
use zetta::manager::ZfsManager;
use zetta::models::LastAction;
use zetta::routes::routes;
use zetta::settings::{load_settings, SettingsError};
use zetta::zfs::Session;

//-----------------------------------------------------
// MAIN FUNCTION
//-----------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_error) = load_settings();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match settings_error {
        None => {}
        Some(SettingsError::NotFound { path }) => {
            info!("{} not found, using default values", path.display())
        }
        Some(e) => warn!("{}. Using defaults.", e),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "starting zetta agent");

    // Fail early when libzfs is unusable rather than on the first request
    drop(Session::new()?);

    // Generate or read API key
    let api_key = get_or_create_api_key(&settings.api_key_file)?;
    info!(path = %settings.api_key_file.display(), "API key loaded");

    let zfs = ZfsManager::new(settings.print_on_error);
    let last_action = Arc::new(RwLock::new(None::<LastAction>));

    let ip: IpAddr = settings.listen.parse()?;
    let addr = SocketAddr::new(ip, settings.port);

    // Start the HTTP server
    info!(%addr, "server listening");
    warp::serve(routes(api_key, zfs, last_action)).run(addr).await;

    Ok(())
}
