#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipLogEventKind {
    FlipApplied,
    SessionReset,
    ExportWritten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipLogEvent {
    pub flip: u64,
    pub kind: FlipLogEventKind,
    pub is_win: Option<bool>,
}

impl FlipLogEvent {
    pub fn new(flip: u64, kind: FlipLogEventKind, is_win: Option<bool>) -> Self {
        Self { flip, kind, is_win }
    }
}

pub trait FlipJournal {
    fn write(&mut self, event: FlipLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryFlipJournal {
    events: Vec<FlipLogEvent>,
}

impl InMemoryFlipJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[FlipLogEvent] {
        &self.events
    }
}

impl FlipJournal for InMemoryFlipJournal {
    fn write(&mut self, event: FlipLogEvent) {
        self.events.push(event);
    }
}
