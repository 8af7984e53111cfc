use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Environment, LogFormat, Settings};

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// per-environment default filter.
pub fn init_logging(settings: &Settings) {
    let env = &settings.env;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(env).into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init(),
    }

    tracing::info!(
        env = ?env,
        format = ?settings.log_format,
        "Logging initialized"
    );
}

fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "aqar_backend=debug,tower_http=debug,sqlx=warn,info",
        Environment::Staging => "aqar_backend=debug,tower_http=info,sqlx=warn,info",
        Environment::Prod => "aqar_backend=info,tower_http=info,warn",
    }
}
