use log::warn;

use super::{GigConnectClient, WorkerQuery};
use crate::model::WorkerRecord;

pub const PROMPT_MESSAGE: &str = "Type a skill or city to search professionals.";
pub const NO_RESULTS_MESSAGE: &str = "No professionals found matching your criteria.";
pub const FAILED_MESSAGE: &str = "Failed to load professionals. Please try again later.";

/// Result of one search, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    /// Both inputs were blank; nothing was requested.
    Prompt,
    Results(Vec<WorkerRecord>),
    NoResults,
    Failed,
}

impl SearchView {
    /// Placeholder text for views without cards.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchView::Prompt => Some(PROMPT_MESSAGE),
            SearchView::Results(_) => None,
            SearchView::NoResults => Some(NO_RESULTS_MESSAGE),
            SearchView::Failed => Some(FAILED_MESSAGE),
        }
    }
}

/// Search page state. The cache holds the list from the latest successful search only.
#[derive(Debug, Clone)]
pub struct SearchSession {
    client: GigConnectClient,
    cache: Vec<WorkerRecord>,
}

impl SearchSession {
    pub fn new(client: GigConnectClient) -> Self {
        Self {
            client,
            cache: Vec::new(),
        }
    }

    pub fn cached(&self) -> &[WorkerRecord] {
        &self.cache
    }

    /// Runs a search for the page inputs. The skill text doubles as the name term.
    pub async fn search(&mut self, skill_input: &str, city_input: &str) -> SearchView {
        self.cache.clear();

        let skill = skill_input.trim();
        let city = city_input.trim();
        if skill.is_empty() && city.is_empty() {
            return SearchView::Prompt;
        }

        let present = |term: &str| (!term.is_empty()).then(|| term.to_string());
        let query = WorkerQuery {
            skill: present(skill),
            name: present(skill),
            city: present(city),
        };

        match self.client.search_workers(&query).await {
            Ok(workers) if workers.is_empty() => SearchView::NoResults,
            Ok(workers) => {
                self.cache = workers.clone();
                SearchView::Results(workers)
            }
            Err(err) => {
                warn!("worker search failed: {err}");
                SearchView::Failed
            }
        }
    }
}
