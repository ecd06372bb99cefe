// Tracing setup shared by the binaries: pretty console output, optional JSON log file,
// and a layer reporting how long each span was open.
use std::env;
use std::fs;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{Id, Subscriber, debug, span};
use tracing_subscriber::{
    EnvFilter,
    fmt,
    layer::{Context, Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// Keeps the non-blocking file writer flushing until process exit
static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

const CRATE_TARGET: &str = "default_alive_ledger";

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("warn,{CRATE_TARGET}={level}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{CRATE_TARGET}=info")))
}

pub fn init_logging(bin_name: String) -> eyre::Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").map(|v| v == "true").unwrap_or(false);

    // Binaries log under their own target, keep them visible alongside the library
    let bin_directive = format!("{}={}", bin_name, console_log_level);
    let console_filter = crate_filter(&console_log_level).add_directive(bin_directive.parse()?);

    let console_layer = fmt::Layer::new().pretty().with_filter(console_filter);

    if log_to_file {
        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_appender = tracing_appender::rolling::never(log_dir, format!("{bin_name}_{timestamp}.log"));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        let file_filter = crate_filter(&file_log_level).add_directive(format!("{}={}", bin_name, file_log_level).parse()?);
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(file_filter);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .with(SpanTimingLayer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .with(SpanTimingLayer)
            .try_init()?;
    }
    Ok(())
}

/// Logs the open duration of every span when it closes
struct SpanTimingLayer;

struct OpenedAt(Instant);

impl<S> Layer<S> for SpanTimingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(OpenedAt(Instant::now()));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            // Release the extensions lock before emitting
            let opened = span.extensions_mut().remove::<OpenedAt>();
            if let Some(OpenedAt(opened)) = opened {
                debug!(span = span.name(), elapsed = ?opened.elapsed(), "span closed");
            }
        }
    }
}
