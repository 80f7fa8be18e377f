//! Store abstraction and the MySQL implementation.

use crate::config::StoreConfig;
use crate::error::LoaderError;
use crate::insert::build_bulk_insert;
use mysql_async::{prelude::*, Conn, Pool};
use tracing::{debug, info};
use vet_types::{SeedValue, Table};

/// Operations the seeder needs from the persistent store.
///
/// Writes are transactional: `bulk_insert` opens a transaction if none is
/// open, and `commit` or `rollback` ends it.
#[async_trait::async_trait]
pub trait SeedStore: Send {
    /// Insert every row in one statement. Returns the number of rows written.
    async fn bulk_insert(
        &mut self,
        table: Table,
        rows: Vec<Vec<SeedValue>>,
    ) -> Result<u64, LoaderError>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> Result<(), LoaderError>;

    /// Roll back the open transaction, if any.
    async fn rollback(&mut self) -> Result<(), LoaderError>;

    /// Read every primary key currently persisted in `table`.
    async fn fetch_ids(&mut self, table: Table) -> Result<Vec<String>, LoaderError>;

    /// Execute a statement that returns no rows.
    async fn execute(&mut self, sql: &str) -> Result<(), LoaderError>;

    /// Release the connection. Further calls fail with `LoaderError::Closed`.
    async fn close(&mut self) -> Result<(), LoaderError>;
}

/// Factory for store connections.
#[async_trait::async_trait]
pub trait Connect: Send + Sync {
    type Store: SeedStore;

    async fn connect(&self) -> Result<Self::Store, LoaderError>;
}

#[async_trait::async_trait]
impl Connect for StoreConfig {
    type Store = MySQLStore;

    async fn connect(&self) -> Result<MySQLStore, LoaderError> {
        MySQLStore::connect(self).await
    }
}

/// A single MySQL connection.
pub struct MySQLStore {
    pool: Pool,
    conn: Option<Conn>,
    in_transaction: bool,
}

impl MySQLStore {
    /// Connect to the configured database and verify the connection.
    pub async fn connect(config: &StoreConfig) -> Result<Self, LoaderError> {
        let pool = Pool::new(config.to_opts());

        let mut conn = pool
            .get_conn()
            .await
            .map_err(|e| LoaderError::Connection(format!("Failed to connect to {config}: {e}")))?;

        conn.query_drop("SELECT 1")
            .await
            .map_err(|e| LoaderError::Connection(format!("Failed to connect to {config}: {e}")))?;

        info!("Connection to MySQL at {} successful", config);

        Ok(Self {
            pool,
            conn: Some(conn),
            in_transaction: false,
        })
    }

    fn conn(&mut self) -> Result<&mut Conn, LoaderError> {
        self.conn.as_mut().ok_or(LoaderError::Closed)
    }
}

#[async_trait::async_trait]
impl SeedStore for MySQLStore {
    async fn bulk_insert(
        &mut self,
        table: Table,
        rows: Vec<Vec<SeedValue>>,
    ) -> Result<u64, LoaderError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len() as u64;
        let (sql, params) = build_bulk_insert(table, rows)?;

        if !self.in_transaction {
            self.conn()?.query_drop("START TRANSACTION").await?;
            self.in_transaction = true;
        }

        self.conn()?.exec_drop(&sql, params).await?;

        Ok(count)
    }

    async fn commit(&mut self) -> Result<(), LoaderError> {
        if !self.in_transaction {
            return Ok(());
        }

        let result = self.conn()?.query_drop("COMMIT").await;
        self.in_transaction = false;
        result.map_err(|e| LoaderError::Commit(e.to_string()))
    }

    async fn rollback(&mut self) -> Result<(), LoaderError> {
        if !self.in_transaction {
            return Ok(());
        }

        self.in_transaction = false;
        self.conn()?.query_drop("ROLLBACK").await?;
        Ok(())
    }

    async fn fetch_ids(&mut self, table: Table) -> Result<Vec<String>, LoaderError> {
        let ids: Vec<String> = self.conn()?.query(table.select_ids_statement()).await?;
        debug!("Fetched {} ids from {}", ids.len(), table);
        Ok(ids)
    }

    async fn execute(&mut self, sql: &str) -> Result<(), LoaderError> {
        self.conn()?.query_drop(sql).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), LoaderError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        // An open transaction is rolled back by the server on disconnect
        self.in_transaction = false;

        // The connection must be back in the pool before it is disconnected
        drop(conn);
        self.pool.clone().disconnect().await?;
        Ok(())
    }
}
