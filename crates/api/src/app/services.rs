//! Service wiring: pick a store, then build every domain service over it.

use std::sync::Arc;

use anyhow::Context;

use realty_auth::{AccountRepository, CredentialStore, Hs256TokenService, Login, TokenVerifier};
#[cfg(feature = "dummy-login")]
use realty_auth::DummyLogin;
use realty_catalog::{
    BuildingRegistry, BuildingRepository, SubscriptionRegistry, SubscriptionRepository,
    UnitLifecycle, UnitRepository,
};
use realty_infra::{InMemoryStore, LoggingMailSender, PgStore, WorkerHandle, spawn_notification_worker};

use crate::config::Config;

#[derive(Clone)]
pub struct AppServices {
    pub credentials: CredentialStore,
    pub login: Login,
    /// `None` when dummy login is switched off at runtime.
    #[cfg(feature = "dummy-login")]
    pub dummy: Option<DummyLogin>,
    pub tokens: Arc<Hs256TokenService>,
    pub buildings: BuildingRegistry,
    pub units: UnitLifecycle,
    pub subscriptions: SubscriptionRegistry,
}

impl AppServices {
    pub fn verifier(&self) -> Arc<dyn TokenVerifier> {
        self.tokens.clone()
    }
}

/// Build services over Postgres when `DATABASE_URL` is set, otherwise in memory.
///
/// Must run inside a Tokio runtime: the notification worker is spawned here.
pub async fn build_services(config: &Config) -> anyhow::Result<(AppServices, WorkerHandle)> {
    match &config.database {
        Some(db) => {
            let store = PgStore::connect(&db.url, db.max_connections, db.acquire_timeout)
                .await
                .context("failed to connect to postgres")?;
            store.migrate().await.context("failed to apply schema")?;
            tracing::info!(max_connections = db.max_connections, "using postgres store");
            Ok(wire(Arc::new(store), config))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            Ok(wire(Arc::new(InMemoryStore::new()), config))
        }
    }
}

fn wire<S>(store: Arc<S>, config: &Config) -> (AppServices, WorkerHandle)
where
    S: AccountRepository + BuildingRepository + UnitRepository + SubscriptionRepository + 'static,
{
    let tokens = Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes()));
    let credentials = CredentialStore::new(store.clone());
    let login = Login::new(credentials.clone(), tokens.clone(), config.token_ttl);

    let (notifier, worker) = spawn_notification_worker(store.clone(), Arc::new(LoggingMailSender));

    #[cfg(feature = "dummy-login")]
    let dummy = config
        .dummy_login
        .then(|| DummyLogin::new(tokens.clone(), config.token_ttl));

    let services = AppServices {
        credentials,
        login,
        #[cfg(feature = "dummy-login")]
        dummy,
        tokens,
        buildings: BuildingRegistry::new(store.clone()),
        units: UnitLifecycle::new(store.clone(), store.clone(), Arc::new(notifier)),
        subscriptions: SubscriptionRegistry::new(store.clone(), store),
    };
    (services, worker)
}
