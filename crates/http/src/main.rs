mod route;

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use folio_lib::{
    config::Config,
    content::Entry,
    frontmatter_file::{keeper::ArcMutex, Keeper},
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::info;

fn load_collection<E: Entry>(content_dir: &Utf8Path) -> Result<(ArcMutex<E>, RecommendedWatcher)> {
    let dir = content_dir.join(E::SCHEMA.collection);
    let keeper = Keeper::<E>::new(&dir)
        .with_context(|| format!("Failed to load the {} collection", E::SCHEMA.collection))?;
    info!("Loaded {} entries from {dir}", keeper.len());

    let entries = ArcMutex::new(keeper);

    let mut watcher = notify::recommended_watcher(entries.clone())?;

    watcher.watch(dir.as_std_path(), RecursiveMode::NonRecursive)?;

    Ok((entries, watcher))
}

async fn run() -> Result<()> {
    let mut args = std::env::args();
    let port = args
        .nth(1)
        .ok_or_else(|| anyhow!("Expected a port number as a first argument"))?;
    if let Some(wd) = args.next() {
        std::env::set_current_dir(wd)?;
    }

    let current_dir = std::env::current_dir()?;
    let current_dir = Utf8PathBuf::try_from(current_dir)?;

    let config = Config::load(&current_dir)?;

    // Watchers stop once dropped.
    let (blog, _blog_watcher) = load_collection(&current_dir)?;
    let (projects, _projects_watcher) = load_collection(&current_dir)?;
    let (work, _work_watcher) = load_collection(&current_dir)?;

    let app = route::router(route::AppState {
        blog,
        projects,
        work,
        page_sizes: config.page_sizes,
        preview_sizes: config.preview_sizes,
    });

    let socket_addr_string = format!("0.0.0.0:{port}");
    info!("Binding to {socket_addr_string}");
    axum::Server::bind(&socket_addr_string.parse()?)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
