//! Book catalog: JSON-file store, query engine, and HTTP routes.

pub mod error;
pub mod models;
pub mod openapi;
pub mod query;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use once_cell::sync::OnceCell;

pub use error::{BookError, BookResult};
pub use models::{Book, BookDto};
pub use service::BookService;
pub use store::BookStore;

/// Book module; the store is opened during `init`.
pub struct BookModule {
    service: OnceCell<Arc<BookService>>,
}

impl BookModule {
    pub const fn new() -> Self {
        Self {
            service: OnceCell::new(),
        }
    }

    /// Module backed by an already opened service.
    pub fn with_service(service: Arc<BookService>) -> Self {
        Self {
            service: OnceCell::with_value(service),
        }
    }

    pub fn service(&self) -> Option<&Arc<BookService>> {
        self.service.get()
    }
}

impl Default for BookModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BookModule {
    fn name(&self) -> &'static str {
        "book"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.service.get().is_some() {
            tracing::debug!(module = self.name(), "book service already provided");
            return Ok(());
        }

        let path = ctx.settings.storage.file_path();
        let service = BookService::open(&path).map_err(|e| {
            anyhow::anyhow!("failed to open book store at {}: {}", path.display(), e)
        })?;

        self.service
            .set(Arc::new(service))
            .map_err(|_| anyhow::anyhow!("book module initialized twice"))?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            path = %path.display(),
            "book module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        match self.service.get() {
            Some(service) => routes::router(service.clone()),
            None => {
                tracing::warn!(module = self.name(), "routes requested before init; none mounted");
                Router::new()
            }
        }
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::spec())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module stopped");
        Ok(())
    }
}

/// Create a new instance of the book module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BookModule::new())
}
