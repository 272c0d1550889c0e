use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::{self, format::FmtSpan};

use crate::cli::LogArgs;

fn filter_level(args: &LogArgs) -> Level {
    if args.quiet {
        Level::ERROR
    } else if args.verbose >= 2 {
        Level::TRACE
    } else if args.verbose == 1 {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber. Logs go to stderr so stdout carries only SQL.
pub fn setup_logging(args: &LogArgs) -> anyhow::Result<()> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(format!("polysql={}", filter_level(args)))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .without_time();

    let subscriber: Box<dyn Subscriber + Send + Sync> = if args.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.compact().finish())
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}
