use clap::Parser;
use std::process::ExitCode;
use wolsend::wol;
use wolsend::wol::noop::LogOnlyTransport;
use wolsend::wol::udp::UdpTransport;
use wolsend::wol::{Transport, WakeError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Send a Wake-on-LAN magic packet", long_about = None)]
struct Args {
    /// Target MAC address, in xx:xx:xx:xx:xx:xx, xx-xx-xx-xx-xx-xx or xxxxxxxxxxxx form.
    mac_addr: String,

    /// UDP port to send the magic packet to, usually 9 or 7.
    #[arg(short, long, env = "WOL_PORT", default_value_t = wol::DEFAULT_PORT)]
    port: u16,

    /// Broadcast or unicast address to send the magic packet to.
    #[arg(short, long, env = "WOL_TARGET", default_value = wol::DEFAULT_TARGET)]
    target: String,

    /// If true, log the packet instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

const EXIT_TRANSMISSION: u8 = 1;
const EXIT_INVALID_MAC: u8 = 2;

fn exit_code(result: &Result<(), WakeError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(WakeError::InvalidMacFormat(_)) => EXIT_INVALID_MAC,
        Err(WakeError::Transmission(_)) => EXIT_TRANSMISSION,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("WARN"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();

    let transport: Box<dyn Transport> = if args.dry_run {
        Box::new(LogOnlyTransport)
    } else {
        Box::new(UdpTransport)
    };

    let result =
        wol::send_magic_packet_with(transport.as_ref(), &args.mac_addr, args.port, &args.target);
    match &result {
        Ok(()) => println!(
            "Sent magic packet for {} to {}:{}",
            args.mac_addr.trim(),
            args.target.trim(),
            args.port
        ),
        Err(e) => eprintln!("{}", e),
    }
    ExitCode::from(exit_code(&result))
}
