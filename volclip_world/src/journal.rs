use serde::{Deserialize, Serialize};

/// Host-side effects, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    BeginTransaction(String),
    EndTransaction(String),
    SetCurrentLevel(String),
    LoadLevel(String),
    Spawn { name: String, level: String },
    Rename { from: String, to: String },
    Destroy(String),
    Relink { volume: String, package: String },
    SelectNone,
    Select(String),
    RedrawViewports,
    RebuildGeometry,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Journal {
    events: Vec<WorldEvent>,
}

impl Journal {
    pub fn record(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Index of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&WorldEvent) -> bool) -> Option<usize> {
        self.events.iter().position(pred)
    }

    /// Index of the last event matching `pred`.
    pub fn rposition(&self, pred: impl Fn(&WorldEvent) -> bool) -> Option<usize> {
        self.events.iter().rposition(pred)
    }

    pub fn count(&self, pred: impl Fn(&WorldEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
