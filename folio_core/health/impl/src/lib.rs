use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use folio_core_health_contracts::{HealthFeatureService, HealthStatus};
use folio_di::Build;
use folio_email_contracts::{EmailCredentials, EmailService, EmailTransport};
use folio_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone, Build)]
pub struct HealthFeatureServiceImpl<Time, Email> {
    time: Time,
    email: Email,
    config: HealthFeatureConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
    pub credentials: Option<Arc<EmailCredentials>>,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl<Time, Email> HealthFeatureService for HealthFeatureServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }

        let status = HealthStatus {
            email: self.verify_email().await,
        };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

impl<Time, Email> HealthFeatureServiceImpl<Time, Email>
where
    Time: TimeService,
    Email: EmailService,
{
    async fn verify_email(&self) -> bool {
        let Some(credentials) = self.config.credentials.as_deref() else {
            error!("Mail account is not configured");
            return false;
        };

        let transport = match self.email.connect(credentials) {
            Ok(transport) => transport,
            Err(err) => {
                error!("Failed to create smtp transport: {err:#}");
                return false;
            }
        };

        transport
            .verify()
            .await
            .inspect_err(|err| error!("Failed to verify smtp transport: {err:#}"))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use folio_email_contracts::{EmailError, MockEmailService, MockEmailTransport};
    use folio_shared_contracts::time::MockTimeService;

    use super::*;

    type Sut = HealthFeatureServiceImpl<MockTimeService, MockEmailService>;

    const TTL: Duration = Duration::from_secs(10);

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_790_000_000, 0).unwrap()
    }

    fn config(credentials: Option<EmailCredentials>) -> HealthFeatureConfig {
        HealthFeatureConfig {
            cache_ttl: TTL,
            credentials: credentials.map(Arc::new),
        }
    }

    fn credentials() -> EmailCredentials {
        EmailCredentials {
            user: "owner@example.com".into(),
            password: "hunter2".to_owned().into(),
        }
    }

    fn time(calls: Vec<DateTime<Utc>>) -> MockTimeService {
        let mut time = MockTimeService::new();
        let count = calls.len();
        let mut calls = calls.into_iter();
        time.expect_now()
            .times(count)
            .returning(move || calls.next().unwrap());
        time
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let transport = MockEmailTransport::new().with_verify(Ok(()));

        let sut = Sut {
            time: MockTimeService::new().with_now(t0()),
            email: MockEmailService::new().with_connect(credentials(), transport),
            config: config(Some(credentials())),
            state: Default::default(),
        };

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: true });
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let sut = Sut {
            time: MockTimeService::new().with_now(t0()),
            email: MockEmailService::new(),
            config: config(None),
            state: Default::default(),
        };

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn verification_failed() {
        // Arrange
        let transport = MockEmailTransport::new()
            .with_verify(Err(EmailError::Network(anyhow!("connection refused"))));

        let sut = Sut {
            time: MockTimeService::new().with_now(t0()),
            email: MockEmailService::new().with_connect(credentials(), transport),
            config: config(Some(credentials())),
            state: Default::default(),
        };

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(result, HealthStatus { email: false });
    }

    #[tokio::test]
    async fn cached() {
        // Arrange
        let transport = MockEmailTransport::new().with_verify(Ok(()));

        let sut = Sut {
            time: time(vec![t0(), t0() + TTL / 2]),
            email: MockEmailService::new().with_connect(credentials(), transport),
            config: config(Some(credentials())),
            state: Default::default(),
        };

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn cache_expired() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_connect()
            .times(2)
            .returning(|_| Ok(MockEmailTransport::new().with_verify(Ok(()))));

        let sut = Sut {
            time: time(vec![t0(), t0() + TTL]),
            email,
            config: config(Some(credentials())),
            state: Default::default(),
        };

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, HealthStatus { email: true });
    }
}
