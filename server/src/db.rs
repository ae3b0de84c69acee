use diesel::connection::{Instrumentation, InstrumentationEvent, SimpleConnection};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PoolError};
use diesel::sqlite::SqliteConnection;

use crate::error::AppError;
use crate::raw_sql;
use crate::telemetry;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Emits one `db.query` span per statement so `DbQueryCountingLayer` can
/// count them.
#[derive(Default)]
struct QueryTracing {
    current: Option<tracing::Span>,
}

impl Instrumentation for QueryTracing {
    fn on_connection_event(&mut self, event: InstrumentationEvent<'_>) {
        match event {
            InstrumentationEvent::StartQuery { query, .. } => {
                self.current = Some(tracing::info_span!(
                    "db.query",
                    db.system = "sqlite",
                    db.statement = %query
                ));
            }
            InstrumentationEvent::FinishQuery { query, error, .. } => {
                let span = self.current.take().unwrap_or_else(tracing::Span::none);
                if let Some(error) = error {
                    span.in_scope(|| tracing::warn!(%query, %error, "query failed"));
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug)]
struct ConnectionSetup;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(raw_sql::CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)?;
        conn.set_instrumentation(QueryTracing::default());
        Ok(())
    }
}

/// Process-wide storage handle. Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn connect(database_url: &str, pool_size: u32) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(ConnectionSetup))
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Create tables and indexes if they are missing. Safe to call repeatedly.
    pub async fn initialize_storage(&self) -> Result<(), AppError> {
        self.immediate_transaction(|conn| {
            for statement in raw_sql::CREATE_TABLES {
                conn.batch_execute(statement)?;
            }
            Ok(())
        })
        .await
    }

    /// Run `f` inside one transaction on a pooled connection.
    ///
    /// Commits when `f` returns `Ok`, rolls back and returns the error
    /// otherwise. The connection goes back to the pool on every path. The
    /// work runs on the blocking pool, so a dropped request future still
    /// lets the transaction finish or roll back as a unit.
    ///
    /// The transaction is deferred: use it for reads. A deferred transaction
    /// that reads and then writes can fail with `SQLITE_BUSY` when another
    /// connection is doing the same, without waiting on `busy_timeout`.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        self.with_connection(move |conn| conn.transaction(f)).await
    }

    /// Same as [`Database::transaction`], but opens with `BEGIN IMMEDIATE`.
    ///
    /// The write lock is taken before `f` runs, so concurrent writers queue
    /// behind `busy_timeout` instead of failing.
    pub async fn immediate_transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        self.with_connection(move |conn| conn.immediate_transaction(f))
            .await
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let span = tracing::Span::current();
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let counter = telemetry::current_query_counter();

        tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                let _entered = span.enter();
                telemetry::with_query_counter(counter, || {
                    let mut pooled = pool.get()?;
                    let conn: &mut SqliteConnection = &mut pooled;
                    f(conn)
                })
            })
        })
        .await?
    }
}
