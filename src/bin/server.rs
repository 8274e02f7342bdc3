use clap::Parser;
use env_logger::Env;
use log::error;
use tcp_echo::tcp_server;

#[derive(Parser, Debug)]
#[clap(name = "server", about = "Echoes length-prefixed text messages back to the sender")]
struct Opts {
    #[clap(long = "host", default_value = "0.0.0.0:7896")]
    address: String,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();
    tcp_server::serve(&opts.address).unwrap_or_else(|err| error!("{:#}", err));
}
