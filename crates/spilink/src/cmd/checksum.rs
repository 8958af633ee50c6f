use spilink_frame::{checksum, crc32};

use crate::cmd::ChecksumArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_checksum, OutputFormat};

pub fn run(args: ChecksumArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    print_checksum(payload.len(), crc32(&payload), checksum(&payload), format);
    Ok(SUCCESS)
}
