use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&settings.telemetry().log_level)));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(fmt::format::FmtSpan::CLOSE);

    let installed = if settings.telemetry().json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|err| anyhow::anyhow!(err.to_string()))
}

/// Quiets connection-level chatter from the HTTP and SQL stacks unless the
/// operator asks for it explicitly.
fn default_directives(level: &str) -> String {
    if level.contains(',') || level.contains('=') {
        return level.to_string();
    }
    format!("{level},hyper=warn,reqwest=warn,sqlx=warn")
}
