use anyhow::Context;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry)?;

    bookshelf_app::run(settings).await
}
