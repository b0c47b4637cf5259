use super::Message;
use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

/// Receiver of the debugger's program mirror.
pub trait Viewer {
    /// Makes sure the viewer is reachable. `Ok(true)` means the
    /// connection is new and the viewer needs the full state.
    fn connect(&mut self) -> io::Result<bool>;
    fn send(&mut self, message: &Message) -> io::Result<()>;
    fn close(&mut self);
}

impl<V: Viewer + ?Sized> Viewer for Box<V> {
    fn connect(&mut self) -> io::Result<bool> {
        (**self).connect()
    }
    fn send(&mut self, message: &Message) -> io::Result<()> {
        (**self).send(message)
    }
    fn close(&mut self) {
        (**self).close()
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullViewer;

impl Viewer for NullViewer {
    fn connect(&mut self) -> io::Result<bool> {
        Ok(false)
    }
    fn send(&mut self, _message: &Message) -> io::Result<()> {
        Ok(())
    }
    fn close(&mut self) {}
}

/// Records messages for inspection.
#[derive(Debug, Default)]
pub struct MemoryViewer {
    connected: bool,
    messages: Vec<Message>,
}

impl MemoryViewer {
    pub fn new() -> MemoryViewer {
        MemoryViewer::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

impl Viewer for MemoryViewer {
    fn connect(&mut self) -> io::Result<bool> {
        let fresh = !self.connected;
        self.connected = true;
        Ok(fresh)
    }
    fn send(&mut self, message: &Message) -> io::Result<()> {
        if !self.connected {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "viewer closed"));
        }
        self.messages.push(message.clone());
        Ok(())
    }
    fn close(&mut self) {
        self.connected = false;
    }
}

/// ## External viewer process
///
/// The viewer reads protocol lines on its standard input. It is
/// launched on first use and again whenever it has exited.
#[derive(Debug)]
pub struct ProcessViewer {
    program: String,
    child: Option<Child>,
}

impl ProcessViewer {
    pub fn new(program: impl Into<String>) -> ProcessViewer {
        ProcessViewer {
            program: program.into(),
            child: None,
        }
    }

    fn launch(&mut self) -> io::Result<()> {
        let child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()?;
        tracing::debug!(program = %self.program, pid = child.id(), "viewer launched");
        self.child = Some(child);
        Ok(())
    }
}

impl Viewer for ProcessViewer {
    fn connect(&mut self) -> io::Result<bool> {
        if let Some(child) = &mut self.child {
            match child.try_wait()? {
                None => return Ok(false),
                Some(status) => {
                    tracing::warn!(%status, "viewer exited, relaunching");
                    self.child = None;
                }
            }
        }
        self.launch()?;
        Ok(true)
    }

    fn send(&mut self, message: &Message) -> io::Result<()> {
        let stdin = match self.child.as_mut().and_then(|c| c.stdin.as_mut()) {
            Some(stdin) => stdin,
            None => return Err(io::Error::new(io::ErrorKind::NotConnected, "viewer not running")),
        };
        writeln!(stdin, "{}", message)?;
        stdin.flush()
    }

    fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            drop(child.stdin.take());
            if let Err(error) = child.wait() {
                tracing::warn!(%error, "viewer did not shut down");
            }
        }
    }
}

impl Drop for ProcessViewer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_viewer_reconnects_fresh() {
        let mut v = MemoryViewer::new();
        assert!(v.connect().unwrap());
        assert!(!v.connect().unwrap());
        v.send(&Message::Print).unwrap();
        v.close();
        assert!(v.send(&Message::Clear).is_err());
        assert!(v.connect().unwrap());
        assert_eq!(v.take(), [Message::Print]);
        assert!(v.messages().is_empty());
    }

    #[test]
    fn test_missing_viewer_program() {
        let mut v = ProcessViewer::new("/nonexistent/tinybasic-viewer");
        assert!(v.connect().is_err());
        assert!(v.send(&Message::Print).is_err());
    }
}
