use anyhow::Context;
use clap::{Parser, Subcommand};

use grampulse_core::{AppConfig, RawPost};
use grampulse_engine::{aggregate, extract, predict, train, TrainedModelArtifact};
use grampulse_scraper::{merge_posts, InstagramClient, PageCursor};
use grampulse_store::{
    cursor_key, get_json, posts_key, profile_key, put_json, BlobStore, LocalBlobStore, MODEL_KEY,
};

#[derive(Debug, Parser)]
#[command(name = "grampulse-cli")]
#[command(about = "GramPulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch an account's timeline and merge it into the local store.
    Scrape {
        /// Account to scrape. Defaults to the configured identity.
        identity: Option<String>,
    },
    /// Train the likes model from stored posts and persist the artifact.
    Train {
        identity: Option<String>,
    },
    /// Print the engagement summary for stored posts.
    Stats {
        identity: Option<String>,
    },
    /// Predict likes for a posting slot using the persisted model.
    Predict {
        /// Hour of day, 0 through 23.
        hour: i64,
        /// Weekday name, e.g. "Tuesday".
        day: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = grampulse_core::load_app_config()?;
    let store = LocalBlobStore::new(config.data_dir.clone());

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { identity } => {
            let identity = identity.unwrap_or_else(|| config.default_identity.clone());
            scrape(&store, &config, &identity).await
        }
        Commands::Train { identity } => {
            let identity = identity.unwrap_or_else(|| config.default_identity.clone());
            train_model(&store, &identity).await
        }
        Commands::Stats { identity } => {
            let identity = identity.unwrap_or_else(|| config.default_identity.clone());
            stats(&store, &identity).await
        }
        Commands::Predict { hour, day } => predict_likes(&store, hour, &day).await,
    }
}

async fn load_posts(store: &dyn BlobStore, identity: &str) -> anyhow::Result<Vec<RawPost>> {
    get_json(store, &posts_key(identity))
        .await?
        .with_context(|| format!("no posts collected for {identity}; run scrape first"))
}

async fn scrape(store: &dyn BlobStore, config: &AppConfig, identity: &str) -> anyhow::Result<()> {
    let client = InstagramClient::from_config(config)?;
    let resume: Option<PageCursor> = get_json(store, &cursor_key(identity)).await?;

    let outcome = client.fetch_all_posts(identity, resume).await?;

    let existing: Vec<RawPost> = get_json(store, &posts_key(identity)).await?.unwrap_or_default();
    let known = existing.len();
    let merged = merge_posts(existing, outcome.posts);
    let fetched = merged.len() - known;

    put_json(store, &posts_key(identity), &merged).await?;
    if !outcome.profile.is_null() {
        put_json(store, &profile_key(identity), &outcome.profile).await?;
    }
    put_json(store, &cursor_key(identity), &outcome.cursor).await?;

    println!("{identity}: {fetched} new posts, {} total", merged.len());
    if outcome.cursor.has_next_page {
        println!("more pages remain; run scrape again to continue");
    }
    Ok(())
}

async fn train_model(store: &dyn BlobStore, identity: &str) -> anyhow::Result<()> {
    let posts = load_posts(store, identity).await?;
    let artifact = train(&extract(&posts))?;
    put_json(store, MODEL_KEY, &artifact).await?;

    println!(
        "trained on {} posts, held-out MAE {:.2}",
        artifact.sample_count, artifact.mean_absolute_error
    );
    Ok(())
}

async fn stats(store: &dyn BlobStore, identity: &str) -> anyhow::Result<()> {
    let posts = load_posts(store, identity).await?;
    let summary = aggregate(&posts);

    println!("{identity}: {} posts", posts.len());
    match summary.best_hour {
        Some(hour) => println!("best hour: {hour}:00"),
        None => println!("best hour: n/a"),
    }
    println!("best day: {}", summary.best_day.unwrap_or("n/a"));
    if let Some(top) = summary.top_post {
        println!(
            "top post: {} ({} engagement at {})",
            top.post_id, top.engagement, top.timestamp
        );
    }
    Ok(())
}

async fn predict_likes(store: &dyn BlobStore, hour: i64, day: &str) -> anyhow::Result<()> {
    let artifact: TrainedModelArtifact = get_json(store, MODEL_KEY)
        .await?
        .context("no trained model found; run train first")?;

    let likes = predict(&artifact, hour, day)?;
    println!("predicted likes for {day} {hour}:00 -> {likes}");
    Ok(())
}
