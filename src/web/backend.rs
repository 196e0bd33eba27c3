//! Terminal output tee: everything written to the real terminal is also
//! broadcast to WebSocket viewers on flush.

use std::io::{self, Stdout, Write};
use tokio::sync::broadcast;

pub struct TeeWriter<W: Write = Stdout> {
    inner: W,
    ws_sender: Option<broadcast::Sender<Vec<u8>>>,
    /// Bytes written since the last flush, sent as one message.
    buffer: Vec<u8>,
}

impl TeeWriter<Stdout> {
    /// Tee stdout to WebSocket clients.
    pub fn new(ws_sender: broadcast::Sender<Vec<u8>>) -> Self {
        Self::with_writer(io::stdout(), Some(ws_sender))
    }
}

impl<W: Write> TeeWriter<W> {
    pub fn with_writer(inner: W, ws_sender: Option<broadcast::Sender<Vec<u8>>>) -> Self {
        Self {
            inner,
            ws_sender,
            buffer: Vec::with_capacity(8192),
        }
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if self.ws_sender.is_some() {
            self.buffer.extend_from_slice(&buf[..n]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()?;

        if let Some(sender) = &self.ws_sender {
            if !self.buffer.is_empty() {
                // No subscribers is fine.
                let _ = sender.send(std::mem::take(&mut self.buffer));
            }
        }
        Ok(())
    }
}
