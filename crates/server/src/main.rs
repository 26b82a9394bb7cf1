use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "peekaboo-server", about = "Local hide-and-seek photo game server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:39117")]
    listen: SocketAddr,
    /// Directory for composite output images. Defaults to ~/.peekaboo.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let data_dir = args.data_dir.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".peekaboo")
    });

    log::info!("serving on http://{} (data dir: {})", args.listen, data_dir.display());
    peekaboo_server::serve(args.listen, data_dir).await
}
