use folio_config::Config;
use folio_di::Provide;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    match email::credentials(&config.email) {
        Some(credentials) => info!(user = %credentials.user, "Mail account configured"),
        None => warn!("Mail account is not configured, contact messages will be rejected"),
    }

    let mut provider = Provider::from_config(&config, email::service(&config.email));
    let server: RestServer = provider.provide();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
