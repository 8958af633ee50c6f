use bytes::BytesMut;
use spilink_frame::{encode_frame, max_frame_size};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    let mut wire = BytesMut::with_capacity(max_frame_size(payload.len()));
    encode_frame(args.function_id, &payload, &mut wire, usize::from(args.max_payload))
        .map_err(|err| frame_error("cannot encode frame", err))?;

    print_encoded(args.function_id, payload.len(), &wire, format);
    Ok(SUCCESS)
}
