//! Chunked bulk-insert loader.
//!
//! The [`BatchLoader`] partitions a stream of records into contiguous chunks
//! and submits each chunk to a [`SeedStore`] as one multi-row INSERT followed
//! by a commit. Chunk failures do not abort the load by default; they are
//! rolled back, logged and recorded in the returned [`LoadReport`] so the
//! caller can decide what to do.
//!
//! ```text
//! records ──► chunks(K) ──► bulk_insert ──► commit ──► next chunk
//!                                │ err          │ err
//!                                └──► rollback ◄┘──► LoadReport.failed_chunks
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod insert;
pub mod store;
pub mod testing;

pub use batch::{chunk_count, chunks, BatchLoader, ChunkFailure, FailurePolicy, LoadReport};
pub use config::StoreConfig;
pub use error::LoaderError;
pub use store::{Connect, MySQLStore, SeedStore};

/// Default number of rows per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
