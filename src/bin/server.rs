use std::{
    error::Error,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use despesas::{
    AppState, CategoryMode, Database, DatabaseTarget, build_router, graceful_shutdown,
    logging_middleware, seed_default_categories,
};

/// The REST API server for recording expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A SQLite file path, `:memory:`, or a `mysql://` connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// The address to serve the API from.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Whether expenses must use a category that has been created.
    #[arg(long, env = "CATEGORY_MODE", value_enum, default_value_t)]
    category_mode: CategoryMode,

    /// Add the default categories if they are missing.
    #[arg(long)]
    seed_default_categories: bool,

    /// File path to write debug logs to.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    let target = DatabaseTarget::parse(args.database_url.as_deref())?;
    tracing::info!("Using {target}");
    let database = Database::connect(&target).await?;

    if args.seed_default_categories {
        seed_default_categories(&mut database.acquire().await?).await?;
        tracing::info!("Seeded default categories");
    }

    let state = AppState::new(database, args.category_mode);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from((args.host, args.port));
    tracing::info!(
        "HTTP server listening on {addr} with {:?} categories",
        args.category_mode
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging(log_path: &str) -> Result<(), std::io::Error> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
