/*!
 * Debug Console
 * Sinks for kernel printf output
 */

use parking_lot::Mutex;

/// Destination for debug printf output
pub trait DebugConsole: Send + Sync {
    fn write(&self, message: &str);
}

/// Emits each message as a tracing event under `sysmem::printf`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl DebugConsole for TracingConsole {
    fn write(&self, message: &str) {
        tracing::info!(target: "sysmem::printf", "{}", message.trim_end_matches('\n'));
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct BufferConsole {
    lines: Mutex<Vec<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages written so far, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl DebugConsole for BufferConsole {
    fn write(&self, message: &str) {
        self.lines.lock().push(message.to_owned());
    }
}
