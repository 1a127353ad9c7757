//! Serial port setup.

use std::time::Duration;

use serialport::SerialPort;

use crate::error::ClientError;

/// Opens `path` at `baudrate` (8N1, no flow control).
///
/// `timeout` bounds each individual read; [`crate::Client`] layers its own
/// per-frame deadline on top.
pub fn open(path: &str, baudrate: u32, timeout: Duration) -> Result<Box<dyn SerialPort>, ClientError> {
    let mut port = serialport::new(path, baudrate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(timeout)
        .open()?;

    // Some USB-UART bridges hold the target in reset until DTR is asserted
    port.write_data_terminal_ready(true)?;
    port.clear(serialport::ClearBuffer::All)?;

    tracing::debug!(path, baudrate, "serial port open");
    Ok(port)
}
