//! Bookshelf application library
//!
//! Wires the book module into the module registry and runs the HTTP server.

pub mod modules;

pub use modules::*;

use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registry holding every application module
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Initialize modules, serve HTTP until shutdown, then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        storage = %settings.storage.file_path().display(),
        "bookshelf bootstrap starting"
    );

    let registry = build_registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(modules = registry.module_count(), "bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_modules().await;

    served?;
    stopped
}
