/// Severity of a diagnostic event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured diagnostic line.
///
/// Producers run outside any frame (socket callbacks), so events are ordered
/// by a sequence number rather than a frame index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub level: Level,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, level: Level, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            seq: self.next_seq,
            level,
            kind,
            message: message.into(),
        });
        self.next_seq += 1;
    }

    pub fn info(&mut self, kind: &'static str, message: impl Into<String>) {
        self.emit(Level::Info, kind, message);
    }

    pub fn warn(&mut self, kind: &'static str, message: impl Into<String>) {
        self.emit(Level::Warn, kind, message);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
