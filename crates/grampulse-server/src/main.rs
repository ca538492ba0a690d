mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use grampulse_engine::{extract, train, ModelRegistry, TrainedModelArtifact};
use grampulse_scraper::InstagramClient;
use grampulse_store::{get_json, posts_key, put_json, BlobStore, LocalBlobStore, MODEL_KEY};

use crate::{
    api::{build_app, AppState},
    middleware::RetrainAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = grampulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(config.data_dir.clone()));
    let registry = Arc::new(bootstrap_registry(store.as_ref(), &config.default_identity).await);
    let scraper = Arc::new(InstagramClient::from_config(&config)?);

    let auth = RetrainAuth::new(config.retrain_token.as_deref());
    let app = build_app(
        AppState {
            store,
            registry,
            scraper,
            default_identity: config.default_identity.clone(),
        },
        auth,
    );

    tracing::info!(addr = %config.bind_addr, identity = %config.default_identity, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Loads the persisted model if one exists, else trains an initial one
/// from any stored posts. Either step failing leaves the registry empty
/// and the predict endpoint answering 503 until a retrain succeeds.
async fn bootstrap_registry(store: &dyn BlobStore, identity: &str) -> ModelRegistry {
    match get_json::<TrainedModelArtifact>(store, MODEL_KEY).await {
        Ok(Some(artifact)) => {
            tracing::info!(
                trained_at = %artifact.trained_at,
                samples = artifact.sample_count,
                "loaded persisted model"
            );
            return ModelRegistry::with_artifact(artifact);
        }
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(error = %error, "could not read persisted model, starting without one");
            return ModelRegistry::empty();
        }
    }

    match initial_train(store, identity).await {
        Ok(Some(artifact)) => {
            tracing::info!(samples = artifact.sample_count, "trained initial model");
            ModelRegistry::with_artifact(artifact)
        }
        Ok(None) => {
            tracing::info!(identity, "no stored posts yet, starting without a model");
            ModelRegistry::empty()
        }
        Err(error) => {
            tracing::warn!(error = %error, "initial training failed, starting without a model");
            ModelRegistry::empty()
        }
    }
}

async fn initial_train(
    store: &dyn BlobStore,
    identity: &str,
) -> anyhow::Result<Option<TrainedModelArtifact>> {
    let Some(posts) = get_json::<Vec<grampulse_core::RawPost>>(store, &posts_key(identity)).await?
    else {
        return Ok(None);
    };
    let artifact = train(&extract(&posts))?;
    put_json(store, MODEL_KEY, &artifact).await?;
    Ok(Some(artifact))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
