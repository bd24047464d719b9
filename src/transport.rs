//! Serial transport
//!
//! Payloads are written one per write call, in dispatch order, and flushed
//! immediately. Nothing is read back here; see [`crate::feedback`].

use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use crate::error::Result;

/// How to open the machine's serial port
#[derive(Debug, Clone, PartialEq)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

/// Open the port 8N1 without flow control
pub fn open_serial(settings: &SerialSettings) -> Result<SerialStream> {
    let stream = tokio_serial::new(&settings.port, settings.baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(settings.timeout)
        .open_native_async()?;
    log::info!(
        "Serial port opened on {} with baud rate {}.",
        settings.port,
        settings.baud_rate
    );
    Ok(stream)
}

/// Ordered, fire-and-forget line writer
#[derive(Debug)]
pub struct Transport<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> Transport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one payload, newline-terminated, and flush it
    pub async fn send(&mut self, payload: &str) -> Result<()> {
        let mut data = String::with_capacity(payload.len() + 1);
        data.push_str(payload);
        if !data.ends_with('\n') {
            data.push('\n');
        }

        self.writer.write_all(data.as_bytes()).await?;
        self.writer.flush().await?;
        log::debug!("sent {:?}", payload);
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_payloads_written_in_order_with_one_terminator() {
        let mut transport = Transport::new(Vec::new());
        transport.send("G1 Y5 F150").await.unwrap();
        transport.send("G91\nG28\nG90\n").await.unwrap();
        transport.send("M5").await.unwrap();

        let written = String::from_utf8(transport.into_inner()).unwrap();
        assert_eq!(written, "G1 Y5 F150\nG91\nG28\nG90\nM5\n");
    }
}
