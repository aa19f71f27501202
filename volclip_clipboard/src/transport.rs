use crate::Result;

/// Moves snapshot text in and out of a shared clipboard.
pub trait Transport {
    fn read(&mut self) -> Result<String>;
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Clipboard held in memory. Stands in for the system clipboard in tests and
/// headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTransport {
    contents: String,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: text.into(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl Transport for MemoryTransport {
    fn read(&mut self) -> Result<String> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.contents = text.to_string();
        Ok(())
    }
}
