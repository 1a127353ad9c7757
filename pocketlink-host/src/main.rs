//! pocketlink-host - Command-line client for pocketlink devices

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pocketlink_host::{open, Client, ClientError};
use pocketlink_protocol::commands::command_name;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pocketlink-host")]
#[command(about = "Talk to a pocketlink device over a serial port")]
#[command(version)]
struct Cli {
    /// Serial port path
    #[arg(short, long, env = "POCKETLINK_PORT", default_value = "/dev/ttyS0")]
    port: String,

    /// Baud rate
    #[arg(short, long, env = "POCKETLINK_BAUD", default_value_t = 115_200)]
    baud: u32,

    /// Reply timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query device status
    Status,

    /// Transmit an NEC infrared code
    SendIr {
        /// NEC address (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_u16)]
        address: u16,

        /// NEC command (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_u16)]
        command: u16,
    },

    /// Query NFC reader status
    NfcStatus,

    /// Start an NFC card scan
    NfcScan,

    /// Read the ROM id of an iButton
    Ibutton,

    /// Send an arbitrary command and print the reply
    Raw {
        /// Command id (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_u8)]
        command: u8,

        /// Payload as hex, e.g. ff001234
        #[arg(value_parser = parse_hex)]
        payload: Option<HexPayload>,
    },
}

fn parse_u16(s: &str) -> Result<u16, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| e.to_string())
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let value = parse_u16(s)?;
    u8::try_from(value).map_err(|_| format!("{s} does not fit in a byte"))
}

#[derive(Clone)]
struct HexPayload(Vec<u8>);

fn parse_hex(s: &str) -> Result<HexPayload, String> {
    hex::decode(s).map(HexPayload).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ClientError> {
    let port = open(&cli.port, cli.baud, Duration::from_millis(50))?;
    let mut client = Client::new(port, Duration::from_millis(cli.timeout_ms));
    tracing::info!(port = %cli.port, baud = cli.baud, "connected");

    match cli.command {
        Commands::Status => {
            println!("{}", client.status()?);
        }
        Commands::SendIr { address, command } => {
            println!("{}", client.send_ir(address, command)?);
        }
        Commands::NfcStatus => {
            println!("{}", client.nfc_status()?);
        }
        Commands::NfcScan => {
            println!("{}", client.nfc_scan()?);
        }
        Commands::Ibutton => {
            let rom = client.read_ibutton()?;
            println!(
                "family 0x{:02x} serial {} crc 0x{:02x}",
                rom.family(),
                hex::encode(rom.serial()),
                rom.crc()
            );
        }
        Commands::Raw { command, payload } => {
            let data = payload.as_ref().map(|p| p.0.as_slice()).unwrap_or_default();
            client.send_frame(command, data)?;
            let reply = client.receive_frame()?;
            println!(
                "0x{:02x} ({}) {}",
                reply.command,
                command_name(reply.command),
                hex::encode(&reply.payload)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(parse_u16("0x00ff"), Ok(0x00FF));
        assert_eq!(parse_u16("4660"), Ok(0x1234));
        assert!(parse_u16("0x10000").is_err());
        assert_eq!(parse_u8("0xFF"), Ok(0xFF));
        assert!(parse_u8("256").is_err());
    }

    #[test]
    fn test_raw_subcommand() {
        let cli = Cli::try_parse_from(["pocketlink-host", "-p", "/dev/null", "raw", "0x42", "0102"])
            .unwrap();
        match cli.command {
            Commands::Raw { command, payload } => {
                assert_eq!(command, 0x42);
                assert_eq!(payload.map(|p| p.0), Some(vec![1, 2]));
            }
            _ => panic!("expected raw"),
        }
    }
}
