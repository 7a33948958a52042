use std::sync::Arc;

use quiz_core::model::QuizCatalog;
use storage::repository::Storage;

use crate::Clock;
use crate::catalog::{bundled_catalog, load_catalog};
use crate::config::AppConfig;
use crate::error::AppServicesError;
use crate::feedback::FeedbackSink;
use crate::history::HistoryService;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<QuizCatalog>,
    history: Arc<HistoryService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or the catalog cannot be initialized.
    pub async fn new_sqlite(
        config: &AppConfig,
        clock: Clock,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::from_storage(config, clock, feedback, &storage)
    }

    /// Build services over an existing storage bundle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the configured catalog is invalid.
    pub fn from_storage(
        config: &AppConfig,
        clock: Clock,
        feedback: Arc<dyn FeedbackSink>,
        storage: &Storage,
    ) -> Result<Self, AppServicesError> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => bundled_catalog()?,
        };
        let catalog = Arc::new(catalog);
        let history = Arc::new(HistoryService::new(clock, Arc::clone(&storage.history)));
        let quiz_loop = Arc::new(
            QuizLoopService::new(clock, Arc::clone(&catalog), Arc::clone(&history))
                .with_feedback(feedback)
                .with_cues(config.sound)
                .with_shuffle_questions(config.shuffle_questions),
        );

        tracing::info!(
            quizzes = catalog.len(),
            shuffle = config.shuffle_questions,
            sound = config.sound,
            "app services ready"
        );

        Ok(Self {
            catalog,
            history,
            quiz_loop,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::SilentFeedback;
    use quiz_core::time::fixed_clock;

    #[test]
    fn in_memory_services_use_bundled_catalog() {
        let config = AppConfig::default();
        let services = AppServices::from_storage(
            &config,
            fixed_clock(),
            Arc::new(SilentFeedback),
            &Storage::in_memory(),
        )
        .unwrap();
        assert_eq!(services.catalog().len(), 3);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let config = AppConfig {
            catalog_path: Some("/nonexistent/quizzes.json".into()),
            ..AppConfig::default()
        };
        let err = AppServices::from_storage(
            &config,
            fixed_clock(),
            Arc::new(SilentFeedback),
            &Storage::in_memory(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, AppServicesError::Catalog(_)));
    }
}
