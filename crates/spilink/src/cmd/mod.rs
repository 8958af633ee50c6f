use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use spilink_frame::MAX_PAYLOAD_SIZE;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod encode;
pub mod send;
pub mod version;

/// `--max-payload` default. The flag is a `u16` because the length field is.
const DEFAULT_MAX_PAYLOAD: u16 = MAX_PAYLOAD_SIZE as u16;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one request over SPI and print the response.
    Send(SendArgs),
    /// Print the wire frame for a request without touching hardware.
    Encode(EncodeArgs),
    /// Decode and validate a captured frame.
    Decode(DecodeArgs),
    /// Print the CRC-32 and check byte of a payload.
    Checksum(ChecksumArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Checksum(args) => checksum::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Payload source; empty when none is given.
#[derive(Args, Debug, Default)]
pub struct PayloadArgs {
    /// Payload as hex bytes (e.g. "AA BB" or "0xAA,0xBB").
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Payload as a raw string.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["hex", "data"])]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn resolve(&self) -> CliResult<Vec<u8>> {
        if let Some(hex) = &self.hex {
            return parse_hex(hex).map_err(|err| CliError::new(USAGE, format!("--hex: {err}")));
        }
        if let Some(data) = &self.data {
            return Ok(data.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
        }
        Ok(Vec::new())
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Function id (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_byte)]
    pub function_id: u8,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// spidev device node.
    #[arg(long, env = "SPILINK_DEVICE", default_value = "/dev/spidev0.0")]
    pub device: PathBuf,
    /// SPI clock in Hz.
    #[arg(long, env = "SPILINK_SPEED_HZ", default_value_t = 500_000)]
    pub speed_hz: u32,
    /// SPI mode (0-3).
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub mode: u8,
    /// GPIO chip carrying the ready line.
    #[arg(long, env = "SPILINK_GPIO_CHIP", default_value = "/dev/gpiochip3")]
    pub gpio_chip: PathBuf,
    /// Ready line offset on the GPIO chip.
    #[arg(long, env = "SPILINK_GPIO_LINE", default_value_t = 15)]
    pub gpio_line: u32,
    /// Give up waiting for the ready line after this long (e.g. 5s, 500ms).
    /// Waits forever when omitted.
    #[arg(long)]
    pub timeout: Option<String>,
    /// Largest payload accepted in either direction.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: u16,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Function id (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_byte)]
    pub function_id: u8,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Largest payload accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: u16,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex (e.g. "48 5A 01 02 00 AA BB 81 0D 0A").
    pub hex: String,
    /// Largest payload accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: u16,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `0x1F`, `1f` style hex or plain decimal into a byte.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|_| format!("invalid byte value: {input}"))
}

/// Parse hex bytes separated by spaces, commas or colons. Tokens may carry a
/// `0x` prefix, and unseparated runs like `485A01` are split into pairs.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    for token in input
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .filter(|t| !t.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(format!("odd number of hex digits in {token:?}"));
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).map_err(|_| format!("invalid hex: {token:?}"))?;
            let byte =
                u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex: {token:?}"))?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_byte_accepts_hex_and_decimal() {
        assert_eq!(parse_byte("0x1F").unwrap(), 0x1F);
        assert_eq!(parse_byte("0Xff").unwrap(), 0xFF);
        assert_eq!(parse_byte("17").unwrap(), 17);
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0xZZ").is_err());
    }

    #[test]
    fn parse_hex_accepts_common_layouts() {
        let expected = vec![0x48, 0x5A, 0x01];
        assert_eq!(parse_hex("48 5A 01").unwrap(), expected);
        assert_eq!(parse_hex("485a01").unwrap(), expected);
        assert_eq!(parse_hex("0x48,0x5A,0x01").unwrap(), expected);
        assert_eq!(parse_hex("48:5A:01").unwrap(), expected);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert!(parse_hex("485").is_err());
        assert!(parse_hex("GG").is_err());
        assert!(parse_hex("0x").is_err());
    }

    #[test]
    fn payload_defaults_to_empty() {
        assert!(PayloadArgs::default().resolve().unwrap().is_empty());
    }
}
