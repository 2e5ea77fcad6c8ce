use anyhow::Result;
use clap::Parser;
use wikiapi::params::parse_pair;
use wikiapi::{ApiOptions, DEFAULT_LIMIT, ParamValue, Params, WIKIPEDIA_API_ENDPOINT, WikipediaApi};

/// wikiapi - Japanese Wikipedia API client
///
/// Query the MediaWiki API of ja.wikipedia.org and print the response.
///
/// Examples:
///   wikiapi page 日本
///   wikiapi search TypeScript --limit 5
///   wikiapi call action=query list=random rnlimit=3
#[derive(Parser, Debug)]
#[command(author, version = env!("WIKIAPI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API endpoint (defaults to https://ja.wikipedia.org/w/api.php)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Maximum number of attempts per request (default 3)
    #[arg(long = "max-retries", value_name = "N", global = true)]
    pub max_retries: Option<u32>,

    /// Per-attempt timeout in milliseconds (default 10000)
    #[arg(long = "timeout", value_name = "MS", global = true)]
    pub timeout: Option<u64>,

    /// User-Agent header sent with each request
    #[arg(long = "user-agent", value_name = "UA", global = true)]
    pub user_agent: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Call the API with arbitrary key=value parameters
    Call(CallArgs),

    /// Parse a page by title
    Page(PageArgs),

    /// Full-text search
    Search(SearchArgs),

    /// List the members of a category
    Category(CategoryArgs),

    /// Show site information
    Siteinfo,
}

#[derive(clap::Args, Debug)]
pub struct CallArgs {
    /// Parameters in the form key=value
    #[arg(value_name = "KEY=VALUE", value_parser = parse_pair, required = true)]
    pub params: Vec<(String, ParamValue)>,
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// Page title
    #[arg(value_name = "TITLE")]
    pub title: String,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

#[derive(clap::Args, Debug)]
pub struct CategoryArgs {
    /// Category name without the "Category:" prefix
    #[arg(value_name = "NAME")]
    pub category: String,

    /// Maximum number of members
    #[arg(long, short = 'l', default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

impl Cli {
    fn options(&self) -> ApiOptions {
        ApiOptions {
            max_retries: self.max_retries,
            timeout_ms: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let options = cli.options();
    let api = WikipediaApi::with_endpoint(
        cli.api_url
            .clone()
            .unwrap_or_else(|| WIKIPEDIA_API_ENDPOINT.to_string()),
    )?;

    let response = match cli.command {
        Commands::Call(args) => {
            let params: Params = args.params.into_iter().collect();
            api.call(&params, &options).await?
        }
        Commands::Page(args) => api.get_page(&args.title, &options).await?,
        Commands::Search(args) => api.search_pages(&args.query, args.limit, &options).await?,
        Commands::Category(args) => {
            api.get_category_members(&args.category, args.limit, &options)
                .await?
        }
        Commands::Siteinfo => api.get_site_info(&options).await?,
    };

    println!("{}", response);
    Ok(())
}
