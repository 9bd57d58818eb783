use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "movierec-server")]
#[command(about = "Content-based movie recommendation server", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "movierec.yaml")]
    config: String,

    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match movierec_rs::config::Config::from_file_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    movierec_rs::init_logging(config.log_format, args.debug);

    if let Err(e) = movierec_rs::run(config, &args.config, args.debug).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
