//! This module provides a `tracing` layer that routes events into the
//! dashboard instead of the terminal.
use super::{default_filter, DiagnosticBuffer};
use crate::ui::DiagnosticLine;
use chrono::Utc;
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    Layer,
};

/// A `tracing` layer that turns events into `DiagnosticLine`s.
pub struct DashboardLogCollector {
    buffer: Arc<DiagnosticBuffer>,
}

impl DashboardLogCollector {
    pub fn new(buffer: Arc<DiagnosticBuffer>) -> Self {
        Self { buffer }
    }

    /// Installs the collector as the global subscriber. Nothing is written to
    /// the console while it is active.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber is already set.
    pub fn init_subscriber(
        buffer: Arc<DiagnosticBuffer>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let subscriber = tracing_subscriber::registry()
            .with(default_filter())
            .with(DashboardLogCollector::new(buffer));

        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }
}

impl<S> Layer<S> for DashboardLogCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        let module = match metadata.module_path() {
            Some(path) => path.rsplit("::").next().unwrap_or(path).to_string(),
            None => metadata.target().to_string(),
        };

        self.buffer.add_entry(DiagnosticLine {
            timestamp: Utc::now(),
            level: *metadata.level(),
            module,
            message,
        });
    }
}

/// Flattens an event's fields into `message key=value ...`.
struct MessageVisitor<'a>(&'a mut String);

impl MessageVisitor<'_> {
    fn set_message(&mut self, message: &str) {
        if self.0.is_empty() {
            self.0.push_str(message);
        } else {
            self.0.insert_str(0, &format!("{} ", message));
        }
    }

    fn push_field(&mut self, name: &str, value: impl std::fmt::Display) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(&format!("{}={}", name, value));
    }
}

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.set_message(&format!("{:?}", value));
        } else {
            self.push_field(field.name(), format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.set_message(value);
        } else {
            self.push_field(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push_field(field.name(), value);
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push_field(field.name(), value);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push_field(field.name(), value);
    }
}
