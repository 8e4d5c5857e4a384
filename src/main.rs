use anyhow::{Context, Result};
use clap::Parser;
use ninjadorks::config::{load_config, run_setup, Config, Credentials, DEFAULT_CONFIG_FILE};
use ninjadorks::download::{ExtensionFilter, FileDownloader, ALL_EXTENSIONS};
use ninjadorks::models::{SearchQuery, DEFAULT_LANG};
use ninjadorks::report::{export_html, export_json, print_table};
use ninjadorks::sources::{search, GoogleSearch};
use ninjadorks::ui::{print_search_header, print_status, Spinner, Status};
use ninjadorks::utils::HttpClient;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// NinjaDorks - Run Google dorks, export the results and download the linked files
#[derive(Parser, Debug)]
#[command(name = "ninjadorks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run Google dorks, export the results and download the linked files", long_about = None)]
struct Cli {
    /// Google dork to run (e.g. 'filetype:sql "MySQL dump" (pass|password|passwd|pwd)')
    #[arg(long, short)]
    query: Option<String>,

    /// Set up the API key and search engine id, then exit
    #[arg(long, short)]
    configure: bool,

    /// First result page to fetch
    #[arg(long, default_value_t = 1)]
    start_page: u32,

    /// Number of result pages to fetch (10 results per page)
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Result language filter (e.g. lang_es, lang_en)
    #[arg(long, default_value = DEFAULT_LANG)]
    lang: String,

    /// Export the results to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Export the results to this HTML file
    #[arg(long)]
    html: Option<PathBuf>,

    /// Extensions to download, comma separated (e.g. "pdf,doc,sql"), or "all"
    #[arg(long, default_value = ALL_EXTENSIONS)]
    download: String,

    /// Do not download any of the result links
    #[arg(long, conflicts_with = "download")]
    no_download: bool,

    /// Directory downloaded files are saved to
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// HTML template used by --html
    #[arg(long)]
    template: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

/// Everything a search run needs once the configuration is loaded
#[derive(Debug)]
struct Run {
    credentials: Credentials,
    query: SearchQuery,
    /// `None` skips the download step
    filter: Option<ExtensionFilter>,
}

impl Cli {
    /// Check credentials and arguments before any network activity.
    ///
    /// The error is the message to print before exiting with status 1.
    fn prepare(&self, config: &Config) -> Result<Run, String> {
        let credentials = config.credentials.resolve().map_err(|e| e.to_string())?;
        let query = self.search_query().ok_or_else(|| {
            "Specify a query with -q/--query. Use -h to see all options.".to_string()
        })?;
        let filter = if self.no_download {
            None
        } else {
            ExtensionFilter::parse(&self.download)
        };

        Ok(Run {
            credentials,
            query,
            filter,
        })
    }

    fn search_query(&self) -> Option<SearchQuery> {
        let query = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())?;
        Some(
            SearchQuery::new(query)
                .start_page(self.start_page)
                .pages(self.pages)
                .lang(&self.lang),
        )
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ninjadorks={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Setup always ends the run so the next invocation starts from a saved file
    if cli.configure || !cli.config.exists() {
        if !cli.configure {
            print_status(
                Status::Warning,
                &format!(
                    "Configuration file {} not found, starting setup",
                    cli.config.display()
                ),
            );
        }
        run_setup(&cli.config).context("Credential setup failed")?;
        std::process::exit(1);
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let Run {
        credentials,
        query: search_query,
        filter,
    } = match cli.prepare(&config) {
        Ok(run) => run,
        Err(message) => {
            print_status(Status::Error, &message);
            std::process::exit(1);
        }
    };

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.http.timeout());
    let client = HttpClient::new(timeout).context("Failed to build HTTP client")?;
    let engine = GoogleSearch::with_base_url(client.clone(), credentials, &config.search.base_url);

    let spinner = if cli.quiet {
        Spinner::hidden()
    } else {
        Spinner::new(&format!(
            "Searching \"{}\" ({} page(s))...",
            search_query.query, search_query.pages
        ))
    };
    let started = Instant::now();
    let outcome = search(&engine, &search_query).await;
    spinner.finish();
    let results = outcome.context("Search failed")?;

    if !cli.quiet {
        print_search_header(&search_query.query, results.len(), started.elapsed());
    }
    print_table(&results);

    if let Some(path) = &cli.html {
        let template = cli
            .template
            .as_ref()
            .unwrap_or(&config.report.html_template);
        export_html(&results, template, path).context("HTML export failed")?;
        if !cli.quiet {
            print_status(
                Status::Success,
                &format!("HTML report written to {}", path.display()),
            );
        }
    }

    if let Some(path) = &cli.json {
        export_json(&results, path).context("JSON export failed")?;
        if !cli.quiet {
            print_status(
                Status::Success,
                &format!("JSON results written to {}", path.display()),
            );
        }
    }

    if let Some(filter) = filter {
        let directory = cli
            .download_dir
            .clone()
            .unwrap_or_else(|| config.downloads.directory.clone());

        let downloader = FileDownloader::new(client, directory).quiet(cli.quiet);
        let report = downloader
            .download(results.links(), &filter)
            .await
            .context("Download failed")?;

        if !cli.quiet && report.attempted() > 0 {
            print_status(
                Status::Info,
                &format!(
                    "{} file(s) downloaded, {} failed, {} skipped",
                    report.saved(),
                    report.failed(),
                    report.skipped()
                ),
            );
        }
    } else {
        tracing::debug!("Download step skipped");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["ninjadorks"]);
        assert!(cli.query.is_none());
        assert!(!cli.configure);
        assert_eq!(cli.start_page, 1);
        assert_eq!(cli.pages, 1);
        assert_eq!(cli.lang, "lang_es");
        assert_eq!(cli.download, "all");
        assert!(!cli.no_download);
        assert_eq!(cli.config, PathBuf::from("ninjadorks.toml"));
        assert!(cli.timeout.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_search_flags() {
        let cli = Cli::parse_from([
            "ninjadorks",
            "-q",
            "filetype:pdf inurl:admin",
            "--start-page",
            "3",
            "--pages",
            "2",
            "--lang",
            "lang_en",
            "--json",
            "out.json",
            "--html",
            "out.html",
            "--download",
            "pdf,sql",
        ]);

        let query = cli.search_query().unwrap();
        assert_eq!(query.query, "filetype:pdf inurl:admin");
        assert_eq!(query.page_range(), 3..5);
        assert_eq!(query.lang, "lang_en");
        assert_eq!(cli.json, Some(PathBuf::from("out.json")));
        assert_eq!(cli.html, Some(PathBuf::from("out.html")));
        assert_eq!(
            ExtensionFilter::parse(&cli.download),
            Some(ExtensionFilter::Only(vec!["pdf".into(), "sql".into()]))
        );
    }

    fn configured() -> Config {
        let mut config = Config::default();
        config.credentials.api_key = Some("key".to_string());
        config.credentials.engine_id = Some("cx".to_string());
        config
    }

    #[test]
    fn test_prepare_requires_credentials() {
        let cli = Cli::parse_from(["ninjadorks", "-q", "filetype:pdf"]);
        let message = cli.prepare(&Config::default()).unwrap_err();
        assert!(message.contains("Missing credentials"));
    }

    #[test]
    fn test_prepare_requires_query() {
        let cli = Cli::parse_from(["ninjadorks"]);
        let message = cli.prepare(&configured()).unwrap_err();
        assert!(message.contains("-q/--query"));
    }

    #[test]
    fn test_prepare_download_selection() {
        let run = Cli::parse_from(["ninjadorks", "-q", "x"])
            .prepare(&configured())
            .unwrap();
        assert_eq!(run.credentials, Credentials::new("key", "cx"));
        assert_eq!(run.query.query, "x");
        assert_eq!(run.filter, Some(ExtensionFilter::All));

        let run = Cli::parse_from(["ninjadorks", "-q", "x", "--download", ""])
            .prepare(&configured())
            .unwrap();
        assert!(run.filter.is_none());

        let run = Cli::parse_from(["ninjadorks", "-q", "x", "--no-download"])
            .prepare(&configured())
            .unwrap();
        assert!(run.filter.is_none());
    }

    #[test]
    fn test_cli_blank_query() {
        let cli = Cli::parse_from(["ninjadorks", "--query", "   "]);
        assert!(cli.search_query().is_none());
    }

    #[test]
    fn test_cli_configure_flag() {
        let cli = Cli::parse_from(["ninjadorks", "-c"]);
        assert!(cli.configure);

        let cli = Cli::parse_from(["ninjadorks", "--configure", "--config", "/tmp/nd.toml"]);
        assert!(cli.configure);
        assert_eq!(cli.config, PathBuf::from("/tmp/nd.toml"));
    }

    #[test]
    fn test_cli_no_download_conflicts() {
        let cli = Cli::parse_from(["ninjadorks", "--no-download"]);
        assert!(cli.no_download);

        assert!(Cli::try_parse_from(["ninjadorks", "--no-download", "--download", "pdf"]).is_err());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["ninjadorks", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["ninjadorks", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_negative_pages() {
        assert!(Cli::try_parse_from(["ninjadorks", "--pages", "-1"]).is_err());
    }
}
