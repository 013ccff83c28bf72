use crate::core::classifier::ClassifierBundle;
use crate::core::forecast::LiveForecaster;
use crate::core::history::load_history;
use crate::core::launch::LaunchClient;
use crate::core::weather::MarineClient;
use crate::core::{ConfigProvider, HistoricalRecord, Storage, SystemClock};
use crate::utils::error::Result;
use std::path::{Component, Path, PathBuf};

pub type LiveService = LiveForecaster<LaunchClient, MarineClient, SystemClock>;

/// Everything the handlers read; built once at startup and never mutated.
pub struct AppContext {
    pub history: Vec<HistoricalRecord>,
    pub classifier: Option<ClassifierBundle>,
    pub forecaster: LiveService,
    pub frontend_dir: PathBuf,
}

impl AppContext {
    /// Startup order: dataset, derived `success` column, classifier, upstream clients.
    pub async fn load<C, S>(config: &C, storage: &S, frontend_dir: impl Into<PathBuf>) -> Result<Self>
    where
        C: ConfigProvider,
        S: Storage,
    {
        let history = load_history(
            storage,
            &config.raw_dataset_path(),
            &config.processed_dataset_path(),
        )
        .await?;

        let classifier = load_classifier(storage, config.model_path()).await;

        let forecaster = LiveForecaster::new(
            LaunchClient::new(config.launch_url(), config.request_timeout())?,
            MarineClient::new(config.marine_url(), config.request_timeout())?,
            SystemClock,
        );

        Ok(Self {
            history,
            classifier,
            forecaster,
            frontend_dir: frontend_dir.into(),
        })
    }

    /// Resolves a front-end file, refusing anything that would leave the front-end directory.
    pub fn frontend_path(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.frontend_dir.join(relative))
    }
}

async fn load_classifier<S: Storage>(storage: &S, path: &str) -> Option<ClassifierBundle> {
    if !storage.exists(path).await {
        tracing::warn!("No classifier at {}; forecasts will use the fallback probability", path);
        return None;
    }
    match ClassifierBundle::load(storage, path).await {
        Ok(bundle) => {
            tracing::info!(
                "Loaded classifier from {} ({} features, accuracy {:.2}%)",
                path,
                bundle.feature_names.len(),
                bundle.accuracy * 100.0
            );
            Some(bundle)
        }
        Err(e) => {
            tracing::warn!("Failed to load classifier {}: {}", path, e);
            None
        }
    }
}
