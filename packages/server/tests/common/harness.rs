//! Test harness with testcontainers for integration testing.
//!
//! Uses a shared Postgres container across all tests for dramatically
//! improved performance. The container and migrations are initialized once
//! on first test, then reused.

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::common::{Role, UserId};
use server_core::domains::auth::JwtService;
use server_core::kernel::{NoopAuditRecorder, ServerDeps};
use server_core::server::build_app;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    /// Initialize shared infrastructure (container + migrations).
    async fn init() -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// Each test gets a fresh pool and dependency container, but reuses the
/// same database container. Fixtures generate unique emails so tests do
/// not collide on the live-email unique index.
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    /// Dependency container wired with a noop audit sink.
    pub deps: Arc<ServerDeps>,
    /// Token service used to mint test credentials.
    pub jwt: Arc<JwtService>,
}

#[async_trait::async_trait]
impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    /// Creates a new test harness using the shared container.
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let jwt = Arc::new(JwtService::new("test_secret", "test_issuer".to_string()));
        let deps = Arc::new(ServerDeps::new(
            db_pool.clone(),
            jwt.clone(),
            Arc::new(NoopAuditRecorder),
        ));

        Ok(Self { db_pool, deps, jwt })
    }

    /// Build the full axum router for request-level tests.
    pub fn app(&self) -> Router {
        build_app(self.db_pool.clone(), self.jwt.clone())
    }

    /// Mint a bearer token for a test identity.
    pub fn token_for(&self, user_id: UserId, role: Role) -> String {
        self.jwt
            .create_token(user_id, role)
            .expect("Failed to create test token")
    }
}
