use std::fmt;

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

/// Fixed filter; the environment is never consulted.
const LOG_FILTER: &str = "info";

/// Field rendered as a bracketed tag in front of the message.
const KIND_FIELD: &str = "kind";

/// One line per event: level symbol, optional `[kind]` tag, message, then
/// any remaining fields as `name=value`.
pub struct ProberFormatter;

#[derive(Default)]
struct LineFields {
    message: String,
    kind: Option<String>,
    rest: Vec<(&'static str, String)>,
}

impl LineFields {
    fn store(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            KIND_FIELD => self.kind = Some(value),
            name => self.rest.push((name, value)),
        }
    }
}

impl Visit for LineFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.store(field, format!("{value:?}"));
    }
}

impl<S, N> FormatEvent<S, N> for ProberFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
            match *event.metadata().level() {
                Level::TRACE => ("[ ]", |s| s.dimmed()),
                Level::DEBUG => ("[?]", |s| s.blue()),
                Level::INFO => ("[+]", |s| s.green().bold()),
                Level::WARN => ("[*]", |s| s.yellow().bold()),
                Level::ERROR => ("[-]", |s| s.red().bold()),
            };

        let mut fields = LineFields::default();
        event.record(&mut fields);

        write!(writer, "{} ", color_func(symbol.into()))?;
        if let Some(kind) = &fields.kind {
            write!(writer, "{} ", color_func(format!("[{kind}]").into()))?;
        }
        write!(writer, "{}", fields.message)?;
        for (name, value) in &fields.rest {
            write!(writer, " {}", format!("{name}={value}").dimmed())?;
        }

        writeln!(writer)
    }
}

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(LOG_FILTER))
        .with_writer(std::io::stderr)
        .event_format(ProberFormatter)
        .init();
}
