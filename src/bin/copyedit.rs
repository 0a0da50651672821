use clap::Parser;
use copyedit::{
    console::Terminal,
    types::ArticleRef,
    wiki::{Wiki, WikiClient},
    Config, Error, Pipeline,
};
use log::{error, info, warn};
use std::{env, path::PathBuf};

#[derive(Parser)]
#[command(
    version,
    about = "Copy-edits a random wiki article needing copy editing. Credentials are read from COPYEDIT_USERNAME and COPYEDIT_PASSWORD."
)]
struct Opts {
    /// A JSON config file. Missing fields take their default.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Edit this article instead of a random one.
    #[arg(long, short)]
    title: Option<String>,
    /// Show the corrections instead of saving them.
    #[arg(long)]
    dry_run: bool,
    /// Do not open the article in a browser.
    #[arg(long)]
    no_browser: bool,
}

fn run(opts: Opts) -> Result<(), Error> {
    let mut config = match &opts.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if opts.no_browser {
        config.open_browser = false;
    }

    let wiki = WikiClient::new(&config.api_url, &config.user_agent)?;

    match (env::var("COPYEDIT_USERNAME"), env::var("COPYEDIT_PASSWORD")) {
        (Ok(username), Ok(password)) => wiki.login(&username, &password)?,
        _ if opts.dry_run => info!("no credentials set, continuing anonymously"),
        _ => warn!("no credentials set, saving will be attempted anonymously"),
    }

    let article: ArticleRef = match &opts.title {
        Some(title) => wiki.article_ref(title)?,
        None => wiki.resolve(&config.random_url)?,
    };
    info!("editing {:?} ({})", article.title, article.url);

    let pipeline = Pipeline::new(config)?;
    let mut console = Terminal::stdio();

    let report = pipeline.run(&wiki, &mut console, &article, opts.dry_run)?;
    info!(
        "{:?}: {} literal fixes, {} corrections, saved: {}",
        report.title,
        report.literal_fixes.iter().map(|(_, n)| n).sum::<usize>(),
        report.corrections.len(),
        report.saved
    );

    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let opts = Opts::parse();

    run(opts).map_err(|e| {
        error!("{}", e);
        e
    })
}
