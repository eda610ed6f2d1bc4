//! Database connection pool utilities.

#[cfg(test)]
use diesel::RunQueryDsl;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Pooled PostgreSQL connections for the Harbor server.
pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Embedded Diesel migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build a pool for `database_url` and bring the schema up to date.
pub fn init_pool(database_url: &str) -> Result<DbPool, String> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .map_err(|err| format!("failed to create database pool: {err}"))?;
    run_migrations(&pool)?;
    Ok(pool)
}

/// Run pending Diesel migrations.
pub fn run_migrations(pool: &DbPool) -> Result<(), String> {
    let mut conn = pool
        .get()
        .map_err(|err| format!("failed to fetch database connection: {err}"))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("failed to run migrations: {err}"))?;
    for version in applied {
        log::info!("applied migration {version}");
    }
    Ok(())
}

/// Point `database_url` at another database on the same server.
#[cfg(test)]
fn with_database(database_url: &str, name: &str) -> String {
    let (url, query) = match database_url.split_once('?') {
        Some((url, query)) => (url, format!("?{query}")),
        None => (database_url, String::new()),
    };
    let server = url.rsplit_once('/').map_or(url, |(server, _)| server);
    format!("{server}/{name}{query}")
}

/// Migrated throwaway database, dropped together with this value.
#[cfg(test)]
pub(crate) struct TestDatabase {
    admin_url: String,
    db_name: String,
    pool: DbPool,
}

#[cfg(test)]
impl TestDatabase {
    /// Create a database next to the one named by `TEST_DATABASE_URL` or `DATABASE_URL`.
    pub(crate) fn new() -> Self {
        use diesel::Connection;

        let base_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("set TEST_DATABASE_URL or DATABASE_URL for PostgreSQL tests");
        let db_name = format!("harbor_test_{}", uuid::Uuid::new_v4().simple());
        let admin_url = with_database(&base_url, "postgres");

        let mut admin = PgConnection::establish(&admin_url).expect("connect admin database");
        diesel::sql_query(format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut admin)
            .expect("create test database");
        let pool = init_pool(&with_database(&base_url, &db_name)).expect("test pool");

        Self {
            admin_url,
            db_name,
            pool,
        }
    }

    pub(crate) fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

#[cfg(test)]
impl Drop for TestDatabase {
    fn drop(&mut self) {
        use diesel::Connection;

        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            let _ = diesel::sql_query(format!(
                "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
                self.db_name
            ))
            .execute(&mut admin);
        }
    }
}
