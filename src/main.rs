use std::io::Write;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use cardscout::api::create_router;
use cardscout::config::CONFIG;
use cardscout::controller::{AppEvent, SearchApp};
use cardscout::gateway::{CardSource, DemoCards, GatewayClient, UpstreamClient};
use cardscout::query_builder::{SEARCH_EXAMPLES, SearchParams, build_search_query};
use cardscout::search_state::{SearchSession, SearchStatus};

#[derive(Parser)]
#[command(name = "cardscout", about = "Trading card search gateway and terminal client")]
struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway (`/api/cards`) and serve the static UI
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        static_dir: Option<String>,
    },
    /// Interactive search in the terminal
    Search(SearchArgs),
    /// Print the query built from structured filters
    Query {
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "subtype")]
        subtypes: Vec<String>,
        #[arg(long = "type")]
        types: Vec<String>,
        #[arg(long)]
        set: Option<String>,
        #[arg(long)]
        rarity: Option<String>,
    },
    /// List example queries
    Examples,
}

#[derive(Args)]
struct SearchArgs {
    /// Gateway base URL
    #[arg(long, conflicts_with_all = ["direct", "offline"])]
    gateway: Option<String>,
    /// Call the card API directly instead of going through the gateway
    #[arg(long, conflicts_with = "offline")]
    direct: bool,
    /// Use the built-in demo cards
    #[arg(long)]
    offline: bool,
    /// Initial query
    query: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { bind, static_dir } => {
            let bind = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let static_dir = static_dir.unwrap_or_else(|| CONFIG.static_dir.clone());
            serve(&bind, &static_dir).await?;
        }
        Command::Search(args) => {
            if args.offline {
                run_search(DemoCards::default(), args.query).await?;
            } else if args.direct {
                run_search(UpstreamClient::from_config(), args.query).await?;
            } else {
                let client = match args.gateway {
                    Some(url) => GatewayClient::new(url),
                    None => GatewayClient::from_config(),
                };
                run_search(client, args.query).await?;
            }
        }
        Command::Query {
            name,
            subtypes,
            types,
            set,
            rarity,
        } => {
            let params = SearchParams {
                name,
                subtypes,
                types,
                set,
                rarity,
            };
            println!("{}", build_search_query(&params));
        }
        Command::Examples => print_examples(),
    }
    Ok(())
}

async fn serve(bind: &str, static_dir: &str) -> anyhow::Result<()> {
    let upstream = UpstreamClient::from_config();
    log::info!(
        "card gateway on {bind}, upstream {}, static files from {static_dir}",
        upstream.base_url()
    );
    let app = create_router(upstream, static_dir);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_search<S: CardSource + 'static>(
    source: S,
    initial: Option<String>,
) -> anyhow::Result<()> {
    let app = SearchApp::new(source, CONFIG.debounce);
    let tx = app.sender();

    if let Some(q) = initial {
        tx.send(AppEvent::Submit(q))?;
    } else {
        print_examples();
    }

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Some(event) => {
                    let quit = matches!(event, AppEvent::Quit);
                    if tx.send(event).is_err() || quit {
                        return;
                    }
                }
                None => eprintln!("commands: /go <query>, /next, /prev, /page <n>, /quit"),
            }
        }
        let _ = tx.send(AppEvent::Quit);
    });

    let mut last_shown: Option<(SearchStatus, u32, usize)> = None;
    app.run(|session| {
        let key = (
            session.status(),
            session.client_page(),
            session.results().len(),
        );
        if last_shown != Some(key) {
            last_shown = Some(key);
            print_session(session);
        }
    })
    .await;
    Ok(())
}

fn parse_command(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    let Some(cmd) = line.strip_prefix('/') else {
        return Some(AppEvent::Typed(line.to_string()));
    };
    let (name, rest) = cmd.split_once(' ').unwrap_or((cmd, ""));
    match name {
        "go" => Some(AppEvent::Submit(rest.to_string())),
        "next" => Some(AppEvent::NextPage),
        "prev" => Some(AppEvent::PrevPage),
        "page" => rest.trim().parse().ok().map(AppEvent::GoToPage),
        "quit" | "q" => Some(AppEvent::Quit),
        _ => None,
    }
}

fn print_session(session: &SearchSession) {
    let mut out = std::io::stdout().lock();
    match session.status() {
        SearchStatus::Idle => {}
        SearchStatus::Loading => {
            let _ = writeln!(out, "Searching for cards...");
        }
        SearchStatus::Error => {
            let _ = writeln!(
                out,
                "Search error: {}",
                session.error().unwrap_or("An unexpected error occurred")
            );
        }
        SearchStatus::Success => {
            let view = session.current_view();
            if view.cards.is_empty() {
                let _ = writeln!(out, "No cards found for \"{}\"", session.query());
                return;
            }
            let _ = writeln!(out, "Search results for \"{}\"", session.query());
            for card in view.cards {
                let _ = writeln!(
                    out,
                    "  {:<16} {:<28} {:<24} {}",
                    card.id,
                    card.name,
                    card.set_name().unwrap_or("-"),
                    card.rarity.as_deref().unwrap_or("-")
                );
            }
            let _ = writeln!(
                out,
                "{}  (page {}/{}{})",
                view.count,
                view.client_page,
                view.total_client_pages,
                if session.has_more_pages() { "+" } else { "" }
            );
        }
    }
}

fn print_examples() {
    println!("Search examples:");
    for example in SEARCH_EXAMPLES.iter() {
        println!("  {:<32} {}", example.query, example.description);
    }
}
