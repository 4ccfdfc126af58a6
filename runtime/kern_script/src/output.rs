//! Where `puts` writes.
//!
//! The runner prints to stdout; tests capture into a buffer and read it
//! back. Enum dispatch, so the common path has no vtable.

use std::sync::Arc;

use parking_lot::Mutex;

pub enum Output {
    Stdout,
    /// Captures everything written, for assertions.
    Buffer(Mutex<String>),
    /// Discards all output.
    Silent,
}

/// Output handle shared between the interpreter and whoever reads it.
pub type SharedOutput = Arc<Output>;

impl Output {
    pub fn stdout() -> SharedOutput {
        Arc::new(Output::Stdout)
    }

    pub fn buffer() -> SharedOutput {
        Arc::new(Output::Buffer(Mutex::new(String::new())))
    }

    pub fn silent() -> SharedOutput {
        Arc::new(Output::Silent)
    }

    /// Write one line (newline appended).
    pub fn println(&self, msg: &str) {
        match self {
            Output::Stdout => println!("{msg}"),
            Output::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            Output::Silent => {}
        }
    }

    /// Everything captured so far; empty for handlers that don't capture.
    pub fn captured(&self) -> String {
        match self {
            Output::Buffer(buf) => buf.lock().clone(),
            Output::Stdout | Output::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Output::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}
