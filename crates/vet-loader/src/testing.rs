//! In-memory store for tests.
//!
//! [`RecordingStore`] implements [`SeedStore`] without a database. It logs
//! every call, keeps inserted rows per table with transactional semantics
//! (staged on insert, persisted on commit, dropped on rollback), and can be
//! told to fail specific inserts or commits.

use crate::error::LoaderError;
use crate::store::{Connect, SeedStore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use vet_types::{SeedValue, Table};

/// A call made against a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BulkInsert(Table, usize),
    Commit,
    Rollback,
    FetchIds(Table),
    Execute(String),
    Close,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    connects: usize,
    fail_connect: bool,
    persisted: HashMap<Table, Vec<Vec<SeedValue>>>,
    staged: Vec<(Table, Vec<Vec<SeedValue>>)>,
    inserts_seen: HashMap<Table, usize>,
    commits_seen: HashMap<Table, usize>,
    fail_inserts: HashSet<(Table, usize)>,
    fail_commits: HashSet<(Table, usize)>,
    closed: bool,
}

/// Shared view of a recording store's state.
///
/// Cloning is cheap; every clone observes the same store.
#[derive(Clone, Default)]
pub struct Recorder {
    state: Arc<Mutex<State>>,
}

impl Recorder {
    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the state from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fail the `nth` (zero-based) bulk insert into `table`.
    pub fn fail_bulk_insert(&self, table: Table, nth: usize) {
        self.lock().fail_inserts.insert((table, nth));
    }

    /// Fail the commit that follows the `nth` bulk insert into `table`.
    pub fn fail_commit(&self, table: Table, nth: usize) {
        self.lock().fail_commits.insert((table, nth));
    }

    /// Make every connection attempt fail.
    pub fn fail_connect(&self) {
        self.lock().fail_connect = true;
    }

    /// Pretend rows with `ids` were already persisted in `table`.
    ///
    /// Only the id column is filled in.
    pub fn preload(&self, table: Table, ids: impl IntoIterator<Item = String>) {
        self.lock()
            .persisted
            .entry(table)
            .or_default()
            .extend(ids.into_iter().map(|id| vec![SeedValue::Text(id)]));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Sizes of every bulk insert into `table`, in call order.
    pub fn bulk_insert_sizes(&self, table: Table) -> Vec<usize> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::BulkInsert(t, rows) if *t == table => Some(*rows),
                _ => None,
            })
            .collect()
    }

    pub fn persisted_ids(&self, table: Table) -> Vec<String> {
        self.persisted_column(table, "id")
    }

    /// Text values of `column` across every committed row of `table`.
    ///
    /// Panics if the table has no such column.
    pub fn persisted_column(&self, table: Table, column: &str) -> Vec<String> {
        let index = table
            .column_index(column)
            .unwrap_or_else(|| panic!("table '{table}' has no column '{column}'"));
        self.lock()
            .persisted
            .get(&table)
            .map(|rows| text_column(rows, index))
            .unwrap_or_default()
    }
}

/// In-memory [`SeedStore`].
#[derive(Default)]
pub struct RecordingStore {
    recorder: Recorder,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    fn ensure_open(state: &State) -> Result<(), LoaderError> {
        if state.closed {
            Err(LoaderError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl SeedStore for RecordingStore {
    async fn bulk_insert(
        &mut self,
        table: Table,
        rows: Vec<Vec<SeedValue>>,
    ) -> Result<u64, LoaderError> {
        let mut state = self.recorder.lock();
        Self::ensure_open(&state)?;
        state.calls.push(Call::BulkInsert(table, rows.len()));

        let nth = {
            let seen = state.inserts_seen.entry(table).or_default();
            let nth = *seen;
            *seen += 1;
            nth
        };

        if state.fail_inserts.contains(&(table, nth)) {
            return Err(LoaderError::Store(format!(
                "injected failure on insert {nth} into '{table}'"
            )));
        }

        let count = rows.len() as u64;
        state.staged.push((table, rows));

        Ok(count)
    }

    async fn commit(&mut self) -> Result<(), LoaderError> {
        let mut state = self.recorder.lock();
        Self::ensure_open(&state)?;
        state.calls.push(Call::Commit);

        let staged = std::mem::take(&mut state.staged);
        let mut failed = None;

        for (table, _) in &staged {
            let seen = state.commits_seen.entry(*table).or_default();
            let nth = *seen;
            *seen += 1;
            if state.fail_commits.contains(&(*table, nth)) {
                failed = Some((*table, nth));
            }
        }

        if let Some((table, nth)) = failed {
            return Err(LoaderError::Commit(format!(
                "injected failure on commit {nth} of '{table}'"
            )));
        }

        for (table, rows) in staged {
            state.persisted.entry(table).or_default().extend(rows);
        }

        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), LoaderError> {
        let mut state = self.recorder.lock();
        Self::ensure_open(&state)?;
        state.calls.push(Call::Rollback);
        state.staged.clear();
        Ok(())
    }

    async fn fetch_ids(&mut self, table: Table) -> Result<Vec<String>, LoaderError> {
        let mut state = self.recorder.lock();
        Self::ensure_open(&state)?;
        state.calls.push(Call::FetchIds(table));
        Ok(state
            .persisted
            .get(&table)
            .map(|rows| text_column(rows, 0))
            .unwrap_or_default())
    }

    async fn execute(&mut self, sql: &str) -> Result<(), LoaderError> {
        let mut state = self.recorder.lock();
        Self::ensure_open(&state)?;
        state.calls.push(Call::Execute(sql.to_string()));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), LoaderError> {
        let mut state = self.recorder.lock();
        if !state.closed {
            state.calls.push(Call::Close);
            state.closed = true;
        }
        Ok(())
    }
}

fn text_column(rows: &[Vec<SeedValue>], index: usize) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(index).and_then(SeedValue::as_text))
        .map(str::to_string)
        .collect()
}

/// [`Connect`] implementation handing out [`RecordingStore`]s that share
/// one [`Recorder`].
#[derive(Clone, Default)]
pub struct RecordingConnector {
    recorder: Recorder,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }
}

#[async_trait::async_trait]
impl Connect for RecordingConnector {
    type Store = RecordingStore;

    async fn connect(&self) -> Result<RecordingStore, LoaderError> {
        let mut state = self.recorder.lock();
        state.connects += 1;

        if state.fail_connect {
            return Err(LoaderError::Connection(
                "injected connection failure".to_string(),
            ));
        }

        state.closed = false;
        drop(state);

        Ok(RecordingStore {
            recorder: self.recorder.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Vec<SeedValue> {
        vec![SeedValue::from(id)]
    }

    #[tokio::test]
    async fn test_commit_persists_staged_rows() {
        let mut store = RecordingStore::new();
        store
            .bulk_insert(Table::Owners, vec![row("a"), row("b")])
            .await
            .unwrap();

        assert!(store.fetch_ids(Table::Owners).await.unwrap().is_empty());

        store.commit().await.unwrap();
        assert_eq!(
            store.fetch_ids(Table::Owners).await.unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rollback_drops_staged_rows() {
        let mut store = RecordingStore::new();
        store.bulk_insert(Table::Pets, vec![row("p")]).await.unwrap();
        store.rollback().await.unwrap();
        store.commit().await.unwrap();

        assert!(store.recorder().persisted_ids(Table::Pets).is_empty());
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let mut store = RecordingStore::new();
        store.close().await.unwrap();

        assert!(matches!(
            store.fetch_ids(Table::Owners).await,
            Err(LoaderError::Closed)
        ));
        assert!(store.recorder().is_closed());
    }

    #[tokio::test]
    async fn test_connector_failure() {
        let connector = RecordingConnector::new();
        connector.recorder().fail_connect();

        assert!(connector.connect().await.is_err());
        assert_eq!(connector.recorder().connects(), 1);
    }

    #[tokio::test]
    async fn test_committed_rows_keep_every_column() {
        let mut store = RecordingStore::new();
        store
            .bulk_insert(
                Table::Pets,
                vec![vec![
                    SeedValue::from("pet-1"),
                    SeedValue::from("owner-9"),
                    SeedValue::from("Rex"),
                    SeedValue::from("Dog"),
                    SeedValue::from("Golden Retriever"),
                    SeedValue::from(3i64),
                ]],
            )
            .await
            .unwrap();
        store.commit().await.unwrap();

        let recorder = store.recorder();
        assert_eq!(recorder.persisted_ids(Table::Pets), vec!["pet-1".to_string()]);
        assert_eq!(
            recorder.persisted_column(Table::Pets, "owner_id"),
            vec!["owner-9".to_string()]
        );
    }

    #[tokio::test]
    async fn test_preload() {
        let connector = RecordingConnector::new();
        connector
            .recorder()
            .preload(Table::Veterinarians, vec!["v1".to_string()]);

        let mut store = connector.connect().await.unwrap();
        assert_eq!(
            store.fetch_ids(Table::Veterinarians).await.unwrap(),
            vec!["v1".to_string()]
        );
    }
}
