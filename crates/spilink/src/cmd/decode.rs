use spilink_frame::decode_frame;
use tracing::debug;

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = parse_hex(&args.hex).map_err(|err| CliError::new(USAGE, err))?;
    debug!(bytes = wire.len(), "decoding frame");

    let frame = decode_frame(&wire, usize::from(args.max_payload))
        .map_err(|err| frame_error("invalid frame", err))?;
    print_frame(frame.function_id, frame.payload, format);
    Ok(SUCCESS)
}
