use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Where formatted log lines end up.
pub trait ConsoleSink: Send + Sync + 'static {
    fn write(&self, level: Level, line: &str);
}

/// `console.error/warn/info/debug` in the browser, stderr elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConsole;

impl ConsoleSink for BrowserConsole {
    #[cfg(target_arch = "wasm32")]
    fn write(&self, level: Level, line: &str) {
        let line = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write(&self, _level: Level, line: &str) {
        eprintln!("{line}");
    }
}

/// Forwards `tracing` events to a console sink as single formatted lines.
pub struct ConsoleLayer<W = BrowserConsole> {
    max_level: Level,
    sink: W,
}

impl ConsoleLayer {
    pub fn new(max_level: Level) -> Self {
        Self::with_sink(max_level, BrowserConsole)
    }
}

impl<W: ConsoleSink> ConsoleLayer<W> {
    pub fn with_sink(max_level: Level, sink: W) -> Self {
        Self { max_level, sink }
    }
}

impl<S: Subscriber, W: ConsoleSink> Layer<S> for ConsoleLayer<W> {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level {
            return;
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);
        self.sink
            .write(*meta.level(), &fields.line(*meta.level(), meta.target()));
    }
}

#[derive(Default)]
struct EventFields {
    message: String,
    rest: String,
}

impl EventFields {
    fn line(&self, level: Level, target: &str) -> String {
        format!("{level} {target}: {}{}", self.message, self.rest)
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.rest, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.rest, " {}={value:?}", field.name());
        }
    }
}

/// Install the console layer as the global subscriber. Safe to call twice.
pub fn init(max_level: Level) {
    use tracing_subscriber::prelude::*;

    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer::new(max_level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::prelude::*;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

    impl ConsoleSink for Captured {
        fn write(&self, level: Level, line: &str) {
            self.0
                .lock()
                .expect("capture lock")
                .push((level, line.to_string()));
        }
    }

    #[test]
    fn formats_message_and_fields() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(ConsoleLayer::with_sink(Level::INFO, captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "maps", url = "/maps/Mars_T.png", status = 404, "cosmetic map image not found");
        });

        let lines = captured.0.lock().expect("capture lock");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert_eq!(
            lines[0].1,
            "WARN maps: cosmetic map image not found url=/maps/Mars_T.png status=404"
        );
    }

    #[test]
    fn drops_events_above_max_level() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(ConsoleLayer::with_sink(Level::INFO, captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("too chatty");
            tracing::info!("kept");
            tracing::error!("also kept");
        });

        let lines = captured.0.lock().expect("capture lock");
        let levels: Vec<Level> = lines.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![Level::INFO, Level::ERROR]);
    }
}
