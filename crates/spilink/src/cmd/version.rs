use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("spilink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: spilink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("build_target: {}", env!("SPILINK_BUILD_TARGET"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "max_payload_size: {}",
        spilink_frame::MAX_PAYLOAD_SIZE
    );
    println!(
        "hardware: {}",
        if cfg!(target_os = "linux") {
            "spidev+gpio-cdev"
        } else {
            "unavailable"
        }
    );

    Ok(SUCCESS)
}
