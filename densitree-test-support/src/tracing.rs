//! In-memory capture of spans and events for instrumentation assertions.
//!
//! [`RecordingLayer::capture`] installs the layer as the thread default for
//! the duration of a closure, so parallel tests never see each other's
//! telemetry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

type Fields = HashMap<String, String>;

#[derive(Default)]
struct Journal {
    closed: Vec<SpanRecord>,
    events: Vec<EventRecord>,
}

/// Layer that keeps every closed span and every event it observes.
#[derive(Clone, Default)]
pub struct RecordingLayer {
    journal: Arc<Mutex<Journal>>,
}

impl RecordingLayer {
    /// Runs `body` with a fresh layer as the thread's default subscriber.
    ///
    /// # Examples
    /// ```
    /// use densitree_test_support::tracing::RecordingLayer;
    ///
    /// let (value, layer) = RecordingLayer::capture(|| {
    ///     tracing::info_span!("outer").in_scope(|| tracing::info!(answer = 42, "done"));
    ///     7
    /// });
    /// assert_eq!(value, 7);
    /// assert!(layer.span("outer").is_some());
    /// assert_eq!(layer.events_with_message("done")[0].field("answer"), Some("42"));
    /// ```
    pub fn capture<T>(body: impl FnOnce() -> T) -> (T, Self) {
        let layer = Self::default();
        let value = tracing::subscriber::with_default(Registry::default().with(layer.clone()), body);
        (value, layer)
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        // Records stay readable after a test thread panics.
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Closed spans, in the order they closed.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.journal().closed.clone()
    }

    /// First closed span named `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<SpanRecord> {
        self.journal().closed.iter().find(|span| span.name == name).cloned()
    }

    /// Events, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.journal().events.clone()
    }

    /// Events whose `message` equals `message`.
    #[must_use]
    pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
        self.journal()
            .events
            .iter()
            .filter(|event| event.message() == Some(message))
            .cloned()
            .collect()
    }
}

/// A span that has closed, with every field it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Callsite name.
    pub name: String,
    /// Fields set at creation or through `Span::record`.
    pub fields: HashMap<String, String>,
}

impl SpanRecord {
    /// Rendered value of `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// One emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Severity.
    pub level: Level,
    /// Emitting target, usually a module path.
    pub target: String,
    /// Fields, `message` included.
    pub fields: HashMap<String, String>,
}

impl EventRecord {
    /// The formatted message, when the event had one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }

    /// Rendered value of `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// Span state kept in the registry extensions until the span closes.
struct Pending(SpanRecord);

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut fields = Fields::new();
            attrs.record(&mut Collect(&mut fields));
            span.extensions_mut().insert(Pending(SpanRecord {
                name: attrs.metadata().name().to_owned(),
                fields,
            }));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        if let Some(Pending(record)) = extensions.get_mut::<Pending>() {
            values.record(&mut Collect(&mut record.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let finished = ctx
            .span(&id)
            .and_then(|span| span.extensions_mut().remove::<Pending>());
        if let Some(Pending(record)) = finished {
            self.journal().closed.push(record);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut Collect(&mut fields));
        let metadata = event.metadata();
        self.journal().events.push(EventRecord {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            fields,
        });
    }
}

/// Visitor that renders every value into a string map.
///
/// Numbers, booleans and errors fall through to `record_debug`, whose
/// output matches their `Display` form.
struct Collect<'a>(&'a mut Fields);

impl Visit for Collect<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}
