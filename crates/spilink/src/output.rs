use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use spilink_frame::HexBytes;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    function_id: u8,
    payload_size: usize,
    payload_hex: String,
    payload_text: Option<&'a str>,
}

#[derive(Serialize)]
struct EncodedOutput {
    function_id: u8,
    payload_size: usize,
    frame_size: usize,
    frame_hex: String,
}

#[derive(Serialize)]
struct ChecksumOutput {
    length: usize,
    crc32: String,
    check_byte: String,
}

/// Print a decoded frame or a response.
pub fn print_frame(function_id: u8, payload: &[u8], format: OutputFormat) {
    let hex = HexBytes(payload).to_string();
    match format {
        OutputFormat::Json => print_json(&FrameOutput {
            function_id,
            payload_size: payload.len(),
            payload_hex: hex,
            payload_text: std::str::from_utf8(payload).ok(),
        }),
        OutputFormat::Table => print_table(
            &["FUNCTION", "SIZE", "PAYLOAD"],
            vec![
                format!("{function_id:#04x}"),
                payload.len().to_string(),
                payload_preview(payload),
            ],
        ),
        OutputFormat::Pretty => {
            println!(
                "function={function_id:#04x} size={} payload={}",
                payload.len(),
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => print_raw(payload),
    }
}

/// Print an encoded wire frame.
pub fn print_encoded(function_id: u8, payload_size: usize, wire: &[u8], format: OutputFormat) {
    let hex = HexBytes(wire).to_string();
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            function_id,
            payload_size,
            frame_size: wire.len(),
            frame_hex: hex,
        }),
        OutputFormat::Table => print_table(
            &["FUNCTION", "PAYLOAD SIZE", "FRAME SIZE", "FRAME"],
            vec![
                format!("{function_id:#04x}"),
                payload_size.to_string(),
                wire.len().to_string(),
                hex,
            ],
        ),
        OutputFormat::Pretty => println!("{hex}"),
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_checksum(length: usize, crc: u32, check_byte: u8, format: OutputFormat) {
    let out = ChecksumOutput {
        length,
        crc32: format!("{crc:#010x}"),
        check_byte: format!("{check_byte:#04x}"),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => print_table(
            &["LENGTH", "CRC32", "CHECK BYTE"],
            vec![out.length.to_string(), out.crc32, out.check_byte],
        ),
        OutputFormat::Pretty => println!(
            "length={} crc32={} check_byte={}",
            out.length, out.crc32, out.check_byte
        ),
        OutputFormat::Raw => print_raw(&[check_byte]),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_table(header: &[&str], row: Vec<String>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec())
        .add_row(row);
    println!("{table}");
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => HexBytes(payload).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_prefers_printable_text() {
        assert_eq!(payload_preview(b"pong"), "pong");
        assert_eq!(payload_preview(&[0xAA, 0xBB]), "AA BB");
        assert_eq!(payload_preview(b"a\r\n"), "61 0D 0A");
    }
}
