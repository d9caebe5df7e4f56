//! Service layer: embedding and vector store clients, ingestion and search

pub mod backoff;
pub mod checkpoint;
pub mod collection;
pub mod embeddings;
pub mod ingest;
pub mod qdrant;
pub mod query;
pub mod records;
pub mod vector_store;

pub use collection::{CollectionManager, EnsureOutcome};
pub use embeddings::{EmbeddingService, OllamaEmbeddingClient};
pub use ingest::{IngestionPipeline, IngestionReport, RunOptions};
pub use qdrant::QdrantStore;
pub use query::{QueryService, SearchOptions};
pub use vector_store::{CollectionInfo, Distance, ScoredPoint, VectorStore};
