//! Named navigation destinations and their string parameters.

use quiz_core::model::QuizId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    History,
    Quiz { id: QuizId },
    Finish { points: u32, total: u32 },
}

impl Route {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::History => "history",
            Route::Quiz { .. } => "quiz",
            Route::Finish { .. } => "finish",
        }
    }

    /// Key-value parameters as the navigator receives them.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Route::Home | Route::History => Vec::new(),
            Route::Quiz { id } => vec![("id", id.to_string())],
            Route::Finish { points, total } => {
                vec![("points", points.to_string()), ("total", total.to_string())]
            }
        }
    }
}
