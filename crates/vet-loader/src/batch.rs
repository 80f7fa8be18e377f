//! Chunked bulk loading.

use crate::error::LoaderError;
use crate::insert::check_chunk_size;
use crate::store::SeedStore;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use vet_types::{SeedRecord, Table};

/// Number of chunks needed for `total` rows at `chunk_size` rows per chunk.
pub fn chunk_count(total: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    total.div_ceil(chunk_size)
}

/// Partition `rows` into contiguous chunks of at most `chunk_size` rows.
///
/// Only the last chunk may be smaller. A `chunk_size` of zero yields nothing.
pub fn chunks<I: IntoIterator>(rows: I, chunk_size: usize) -> Chunks<I::IntoIter> {
    Chunks {
        inner: rows.into_iter(),
        chunk_size,
    }
}

/// Iterator returned by [`chunks`].
pub struct Chunks<I> {
    inner: I,
    chunk_size: usize,
}

impl<I: Iterator> Chunks<I> {
    /// Count the rows not yet handed out, consuming the iterator.
    pub fn remaining_rows(self) -> usize {
        match self.inner.size_hint() {
            (lower, Some(upper)) if lower == upper => lower,
            _ => self.inner.count(),
        }
    }
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.chunk_size == 0 {
            return None;
        }

        let chunk: Vec<I::Item> = self.inner.by_ref().take(self.chunk_size).collect();
        if chunk.is_empty() {
            None
        } else {
            Some(chunk)
        }
    }
}

/// What the loader does after a chunk fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next chunk.
    #[default]
    Continue,
    /// Record the failure and stop; remaining rows are counted as skipped.
    Abort,
}

/// A chunk that was not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Zero-based position of the chunk within the load.
    pub index: usize,
    /// Rows in the chunk.
    pub rows: usize,
    pub error: String,
}

/// Outcome of one [`BatchLoader::load`] call.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: Table,
    /// Chunks handed to the store, failed ones included.
    pub chunks_submitted: usize,
    pub rows_inserted: u64,
    pub failed_chunks: Vec<ChunkFailure>,
    /// Rows never submitted because the load was aborted.
    pub rows_skipped: u64,
    pub duration: Duration,
}

impl LoadReport {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            chunks_submitted: 0,
            rows_inserted: 0,
            failed_chunks: Vec::new(),
            rows_skipped: 0,
            duration: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed_chunks.is_empty() && self.rows_skipped == 0
    }

    pub fn failed_chunk_indices(&self) -> Vec<usize> {
        self.failed_chunks.iter().map(|f| f.index).collect()
    }

    /// Rows that were generated but not persisted.
    pub fn rows_lost(&self) -> u64 {
        self.failed_chunks.iter().map(|f| f.rows as u64).sum::<u64>() + self.rows_skipped
    }

    pub fn rows_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Submits records to a store in fixed-size chunks, one commit per chunk.
#[derive(Debug, Clone, Copy)]
pub struct BatchLoader {
    chunk_size: usize,
    policy: FailurePolicy,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CHUNK_SIZE)
    }
}

impl BatchLoader {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Load `records` into their table.
    ///
    /// Returns an error only when the chunk size is unusable for the table,
    /// in which case nothing is sent to the store. Chunk failures are
    /// reported through [`LoadReport::failed_chunks`].
    pub async fn load<S, R, I>(
        &self,
        store: &mut S,
        records: I,
    ) -> Result<LoadReport, LoaderError>
    where
        S: SeedStore + ?Sized,
        R: SeedRecord,
        I: IntoIterator<Item = R>,
    {
        let table = R::TABLE;
        check_chunk_size(table, self.chunk_size)?;

        let start = Instant::now();
        let mut report = LoadReport::new(table);
        let mut pending = chunks(records.into_iter().map(R::into_values), self.chunk_size);
        let mut aborted = false;

        info!("Loading '{}' in chunks of {} rows", table, self.chunk_size);

        for (index, chunk) in pending.by_ref().enumerate() {
            let rows = chunk.len();
            report.chunks_submitted += 1;

            match submit_chunk(store, table, chunk).await {
                Ok(inserted) => {
                    report.rows_inserted += inserted;
                    debug!(
                        "Chunk {} of '{}' committed: {} rows ({} total)",
                        index, table, inserted, report.rows_inserted
                    );
                }
                Err(e) => {
                    error!("Chunk {} of '{}' ({} rows) failed: {}", index, table, rows, e);

                    if let Err(rollback_err) = store.rollback().await {
                        warn!("Rollback after failed chunk {} failed: {}", index, rollback_err);
                    }

                    report.failed_chunks.push(ChunkFailure {
                        index,
                        rows,
                        error: e.to_string(),
                    });

                    if self.policy == FailurePolicy::Abort {
                        aborted = true;
                        break;
                    }
                }
            }
        }

        if aborted {
            report.rows_skipped = pending.remaining_rows() as u64;
            warn!(
                "Aborted load of '{}' after a failed chunk; {} rows skipped",
                table, report.rows_skipped
            );
        }

        report.duration = start.elapsed();

        if report.is_success() {
            info!(
                "Loaded {} rows into '{}' in {} chunks ({:?}, {:.2} rows/sec)",
                report.rows_inserted,
                table,
                report.chunks_submitted,
                report.duration,
                report.rows_per_second()
            );
        } else {
            warn!(
                "Loaded {} rows into '{}'; chunks {:?} failed, {} rows not persisted",
                report.rows_inserted,
                table,
                report.failed_chunk_indices(),
                report.rows_lost()
            );
        }

        Ok(report)
    }
}

async fn submit_chunk<S: SeedStore + ?Sized>(
    store: &mut S,
    table: Table,
    chunk: Vec<Vec<vet_types::SeedValue>>,
) -> Result<u64, LoaderError> {
    let inserted = store.bulk_insert(table, chunk).await?;
    store.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingStore};
    use vet_types::Owner;

    fn owners(n: usize) -> Vec<Owner> {
        (0..n)
            .map(|i| Owner {
                id: format!("owner-{i}"),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone: "555-010-0199".to_string(),
                email: "ada@example.com".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, 10), 0);
        assert_eq!(chunk_count(1, 10), 1);
        assert_eq!(chunk_count(10, 10), 1);
        assert_eq!(chunk_count(11, 10), 2);
        assert_eq!(chunk_count(25_000, 10_000), 3);
        assert_eq!(chunk_count(5, 0), 0);
    }

    #[test]
    fn test_chunks_preserve_order_and_sizes() {
        for total in [0usize, 1, 6, 7, 20, 23] {
            for size in [1usize, 3, 7, 50] {
                let data: Vec<usize> = (0..total).collect();
                let parts: Vec<Vec<usize>> = chunks(data.clone(), size).collect();

                assert_eq!(parts.len(), chunk_count(total, size));
                assert!(parts.iter().all(|c| !c.is_empty() && c.len() <= size));
                if let Some((last, rest)) = parts.split_last() {
                    assert!(rest.iter().all(|c| c.len() == size));
                    assert!(last.len() <= size);
                }
                assert_eq!(parts.concat(), data);
            }
        }
    }

    #[test]
    fn test_remaining_rows() {
        let mut it = chunks(0..10, 4);
        it.next();
        assert_eq!(it.remaining_rows(), 6);

        let mut filtered = chunks((0..10).filter(|i| i % 2 == 0), 2);
        filtered.next();
        assert_eq!(filtered.remaining_rows(), 3);
    }

    #[tokio::test]
    async fn test_load_25000_in_three_chunks() {
        let mut store = RecordingStore::new();
        let loader = BatchLoader::new(10_000);

        let report = loader.load(&mut store, owners(25_000)).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.chunks_submitted, 3);
        assert_eq!(report.rows_inserted, 25_000);
        assert_eq!(
            store.recorder().bulk_insert_sizes(Table::Owners),
            vec![10_000, 10_000, 5_000]
        );
        assert_eq!(store.recorder().persisted_ids(Table::Owners).len(), 25_000);
    }

    #[tokio::test]
    async fn test_commit_follows_each_insert() {
        let mut store = RecordingStore::new();
        BatchLoader::new(2).load(&mut store, owners(3)).await.unwrap();

        assert_eq!(
            store.recorder().calls(),
            vec![
                Call::BulkInsert(Table::Owners, 2),
                Call::Commit,
                Call::BulkInsert(Table::Owners, 1),
                Call::Commit,
            ]
        );
    }

    #[tokio::test]
    async fn test_short_sequence_single_partial_chunk() {
        let mut store = RecordingStore::new();
        let report = BatchLoader::new(10_000)
            .load(&mut store, owners(7))
            .await
            .unwrap();

        assert_eq!(report.chunks_submitted, 1);
        assert_eq!(store.recorder().bulk_insert_sizes(Table::Owners), vec![7]);
    }

    #[tokio::test]
    async fn test_empty_sequence_makes_no_calls() {
        let mut store = RecordingStore::new();
        let report = BatchLoader::new(10).load(&mut store, owners(0)).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.chunks_submitted, 0);
        assert!(store.recorder().calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_chunk_size_sends_nothing() {
        let mut store = RecordingStore::new();

        let err = BatchLoader::new(0)
            .load(&mut store, owners(3))
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidChunkSize(0)));

        let err = BatchLoader::new(20_000)
            .load(&mut store, owners(3))
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::TooManyPlaceholders { .. }));

        assert!(store.recorder().calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_chunk_continues() {
        let mut store = RecordingStore::new();
        store.recorder().fail_bulk_insert(Table::Owners, 1);

        let report = BatchLoader::new(10).load(&mut store, owners(35)).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.chunks_submitted, 4);
        assert_eq!(report.failed_chunk_indices(), vec![1]);
        assert_eq!(report.rows_inserted, 25);
        assert_eq!(report.rows_lost(), 10);
        assert_eq!(report.rows_skipped, 0);

        let persisted = store.recorder().persisted_ids(Table::Owners);
        assert_eq!(persisted.len(), 25);
        assert!(!persisted.contains(&"owner-10".to_string()));
        assert!(persisted.contains(&"owner-20".to_string()));
        assert!(store.recorder().calls().contains(&Call::Rollback));
    }

    #[tokio::test]
    async fn test_failed_commit_is_reported() {
        let mut store = RecordingStore::new();
        store.recorder().fail_commit(Table::Owners, 0);

        let report = BatchLoader::new(10).load(&mut store, owners(15)).await.unwrap();

        assert_eq!(report.failed_chunk_indices(), vec![0]);
        assert_eq!(store.recorder().persisted_ids(Table::Owners).len(), 5);
    }

    #[tokio::test]
    async fn test_failed_chunk_aborts() {
        let mut store = RecordingStore::new();
        store.recorder().fail_bulk_insert(Table::Owners, 1);

        let report = BatchLoader::new(10)
            .with_policy(FailurePolicy::Abort)
            .load(&mut store, owners(35))
            .await
            .unwrap();

        assert_eq!(report.chunks_submitted, 2);
        assert_eq!(report.failed_chunk_indices(), vec![1]);
        assert_eq!(report.rows_inserted, 10);
        assert_eq!(report.rows_skipped, 15);
        assert_eq!(report.rows_lost(), 25);
        assert_eq!(store.recorder().bulk_insert_sizes(Table::Owners), vec![10, 10]);
    }

    #[test]
    fn test_rows_per_second() {
        let mut report = LoadReport::new(Table::Pets);
        assert_eq!(report.rows_per_second(), 0.0);

        report.rows_inserted = 1000;
        report.duration = Duration::from_secs(10);
        assert_eq!(report.rows_per_second(), 100.0);
    }
}
