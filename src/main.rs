use clap::Parser;
use env_logger::Env;
use tcp_echo::tcp_client::{self, PORT};

#[derive(Parser, Debug)]
#[clap(name = "client", about = "Sends three tagged messages to an echo server on port 7896")]
struct Opts {
    /// Text placed at the start of every message
    tag: String,
    /// Host name or IP address of the echo server
    host: String,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let report = tcp_client::run(&opts.tag, &opts.host, PORT, |reply| {
        println!("Recebido: {}", reply)
    });
    for line in report.diagnostics() {
        println!("{}", line);
    }
}
