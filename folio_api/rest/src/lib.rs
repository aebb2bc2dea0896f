use std::net::IpAddr;

use axum::Router;
use folio_core_contact_contracts::ContactFeatureService;
use folio_core_health_contracts::HealthFeatureService;
use folio_di::Build;
use tokio::net::TcpListener;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind((self.config.host, self.config.port)).await?;
        axum::serve(listener, self.router()).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()));

        // the last layer added runs first
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
