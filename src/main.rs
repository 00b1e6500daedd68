use browser_launcher::config::{Config, DEFAULT_PORT};
use browser_launcher::{browser, logging, server};
use clap::Parser;

const EXIT_SERVER: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "launcher")]
#[command(about = "Open URLs received over HTTP in the default browser", long_about = None)]
#[command(version)]
struct Cli {
    /// Port to listen on (all interfaces)
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging();

    let config = Config::with_port(cli.port);
    let opener = browser::platform_opener(config.open_timeout);

    if let Err(e) = server::run(config, opener).await {
        eprintln!("launcher error: {:#}", e);
        std::process::exit(EXIT_SERVER);
    }
}
