use clap::Parser;
use std::io::BufRead;
use tokio::sync::Mutex;

use movierec_rs::client::{HtmlPage, HttpSource, Page, SubmissionHandler};
use movierec_rs::config::Config;

#[derive(Parser, Debug)]
#[command(name = "movierec")]
#[command(about = "Ask a movierec server for recommendations", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "movierec.yaml")]
    config: String,

    /// Server base URL, overrides `client.server` from the config file.
    #[arg(short, long)]
    server: Option<String>,

    /// Request timeout in seconds, overrides `client.timeout`.
    #[arg(short, long)]
    timeout: Option<u64>,

    #[arg(short, long)]
    debug: bool,

    /// Titles to submit. Read from stdin, one per line, when none are given.
    titles: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match Config::from_file_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(server) = args.server {
        config.client.server = server;
    }
    if args.timeout.is_some() {
        config.client.timeout = args.timeout;
    }

    movierec_rs::init_logging(config.log_format, args.debug);

    let source = match HttpSource::new(&config.client.server, config.client.timeout()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(endpoint = source.endpoint(), "Submitting to server");

    let handler = SubmissionHandler::new(source);
    let page = Mutex::new(HtmlPage::new());

    let titles = if args.titles.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .map_while(Result::ok)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    } else {
        args.titles
    };

    for title in titles {
        let mut event = {
            let mut page = page.lock().await;
            page.set_title(title);
            page.submit()
        };
        handler.handle(&mut event, &page).await;
        println!("{}", page.lock().await.output());
    }
}
