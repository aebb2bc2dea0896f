use std::sync::Arc;

use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::ContactFeatureConfig;
use folio_core_health_impl::HealthFeatureConfig;
use folio_di::provider;
use types::Email;

use crate::email;

pub mod types;

provider! {
    /// Provides every service of the application
    pub Provider {
        email: Email,

        // API
        rest_server_config: RestServerConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl Provider {
    pub fn from_config(config: &Config, email: Email) -> Self {
        let credentials = email::credentials(&config.email).map(Arc::new);

        Self::new(
            email,
            RestServerConfig {
                host: config.http.host,
                port: config.http.port,
            },
            ContactFeatureConfig {
                credentials: credentials.clone(),
            },
            HealthFeatureConfig {
                cache_ttl: config.health.cache_ttl.into(),
                credentials,
            },
        )
    }
}
