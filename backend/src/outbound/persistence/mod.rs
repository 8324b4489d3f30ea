//! Document store adapters.
//!
//! Both adapters keep the whole collection in memory behind a
//! `tokio::sync::RwLock`. The file-backed adapter additionally writes a JSON
//! snapshot of the collection after every mutation and reloads it on open.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use mockable::DefaultClock;
//! use shelfmates::domain::BookDoc;
//! use shelfmates::outbound::persistence::InMemoryDocumentStore;
//!
//! let store = InMemoryDocumentStore::<BookDoc>::new(Arc::new(DefaultClock));
//! # let _ = store;
//! ```

mod collection;
mod file_document_store;
mod in_memory_document_store;

pub use file_document_store::{FileDocumentStore, FileStoreError};
pub use in_memory_document_store::InMemoryDocumentStore;
