//! Tracing subscriber bootstrap.

use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// Build the log filter: `RUST_LOG` when set, the configured directive otherwise.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter).map_err(|e| {
            anyhow::anyhow!("invalid log filter '{}': {}", settings.filter, e)
        }),
    }
}

/// Build the fmt subscriber for the configured format.
pub fn subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    match format {
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    }
}

/// Initialize the global tracing subscriber, writing to stderr so stdout stays
/// free for command output.
///
/// Calling this more than once is harmless; only the first subscriber wins.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let installed = tracing::subscriber::set_global_default(subscriber(
        settings.log_format,
        filter,
        std::io::stderr,
    ))
    .is_ok();

    tracing::info!(
        target: "bookshelf-telemetry",
        format = ?settings.log_format,
        installed,
        "telemetry initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(format: LogFormat) -> String {
        let out = Captured::default();
        let subscriber = subscriber(format, EnvFilter::new("info"), out.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(books = 3, "catalog loaded");
        });
        out.text()
    }

    #[test]
    fn pretty_format_spans_several_lines() {
        let text = capture(LogFormat::Pretty);
        assert!(text.contains("catalog loaded"));
        assert!(text.lines().filter(|l| !l.trim().is_empty()).count() > 1);
        assert!(serde_json::from_str::<serde_json::Value>(text.trim()).is_err());
    }

    #[test]
    fn json_format_emits_one_object_per_event() {
        let text = capture(LogFormat::Json);
        let event: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(event["fields"]["message"], "catalog loaded");
        assert_eq!(event["fields"]["books"], 3);
    }

    #[test]
    fn rejects_malformed_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            filter: "bookshelf=loud".to_string(),
        };
        assert!(env_filter(&settings).is_err());
    }

    #[test]
    fn init_twice_is_harmless() {
        let settings = TelemetrySettings::default();
        init(&settings).unwrap();
        init(&settings).unwrap();
    }
}
