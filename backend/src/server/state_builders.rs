//! Builders selecting document store adapters for the HTTP state.

use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use shelfmates::domain::Document;
use shelfmates::domain::ports::DocumentStore;
use shelfmates::inbound::http::state::{HttpState, HttpStateStores};
use shelfmates::outbound::persistence::{FileDocumentStore, FileStoreError};

use super::ServerConfig;

fn open_store<D: Document>(
    dir: &Path,
    clock: &Arc<dyn Clock>,
) -> Result<Arc<dyn DocumentStore<D>>, FileStoreError> {
    Ok(Arc::new(FileDocumentStore::<D>::open(dir, clock.clone())?))
}

/// One snapshot-backed store per collection under `dir`.
fn file_backed_stores(dir: &Path, clock: Arc<dyn Clock>) -> Result<HttpStateStores, FileStoreError> {
    Ok(HttpStateStores {
        users: open_store(dir, &clock)?,
        books: open_store(dir, &clock)?,
        folders: open_store(dir, &clock)?,
        ratings: open_store(dir, &clock)?,
        invitations: open_store(dir, &clock)?,
        recommendations: open_store(dir, &clock)?,
        profiles: open_store(dir, &clock)?,
    })
}

/// Build the shared HTTP state, persisting to disk when a data directory is
/// configured and keeping everything in memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let stores = match config.data_dir() {
        Some(dir) => {
            info!(data_dir = %dir.display(), "using file-backed document stores");
            file_backed_stores(dir, clock).map_err(std::io::Error::other)?
        }
        None => {
            info!("using in-memory document stores; data is lost on restart");
            HttpStateStores::in_memory(clock)
        }
    };
    Ok(web::Data::new(HttpState::new(stores)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use rstest::rstest;
    use shelfmates::domain::BookDoc;

    #[rstest]
    #[tokio::test]
    async fn data_dir_selects_snapshot_stores() {
        let dir = tempfile::tempdir().expect("temp dir");
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let stores = file_backed_stores(dir.path(), clock).expect("stores open");
        stores
            .books
            .create_one(BookDoc::unrated("Dune", "Frank Herbert", ""))
            .await
            .expect("book stored");
        assert!(dir.path().join("books.json").exists());

        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("addr"),
        )
        .with_data_dir(Some(dir.path().to_path_buf()));
        let state = build_http_state(&config).expect("state builds");
        let reopened = state.books.get_books(None).await.expect("books load");
        assert_eq!(reopened.len(), 1);
    }
}
