use clap::Parser;
use log::info;
use std::sync::Arc;
use wolsend::server::WakeService;
use wolsend::wol;
use wolsend::wol::noop::LogOnlyTransport;
use wolsend::wol::udp::UdpTransport;
use wolsend::wol::Transport;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "WOL_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,

    /// UDP port used when a wake request does not name one.
    #[arg(long, env = "WOL_PORT", default_value_t = wol::DEFAULT_PORT)]
    port: u16,

    /// Destination address used when a wake request leaves it blank.
    #[arg(long, env = "WOL_TARGET", default_value = wol::DEFAULT_TARGET)]
    target: String,

    /// If true, log magic packets instead of putting them on the network.
    #[arg(long)]
    use_fake_transport: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("INFO"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();

    let transport: Arc<dyn Transport> = if args.use_fake_transport {
        info!("Using log-only transport");
        Arc::new(LogOnlyTransport)
    } else {
        Arc::new(UdpTransport)
    };
    let service = WakeService::new(transport, args.port, args.target);

    info!("Starting server on {}...", args.http_addr);
    let server = rouille::Server::new(args.http_addr.as_str(), move |request| {
        service.handle(request)
    })?;
    server.run();
    Ok(())
}
