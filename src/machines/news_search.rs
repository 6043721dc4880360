//! News search: query input, loading, results and failures.
//!
//! Queries shorter than [`SearchConfig::min_query_len`] never reach the
//! provider. Entering `Loading` performs the search; actions dispatched while
//! it runs queue up and are evaluated against the result.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::collaborators::{Article, NewsProvider};
use crate::config::{RuntimeConfig, SearchConfig};
use crate::core::Decision;
use crate::effects::{HandlerResult, MachineDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const LABEL: &str = "news_search";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SearchState {
    NoSearch {
        query: String,
    },
    Loading {
        query: String,
    },
    Success {
        query: String,
        articles: Vec<Article>,
    },
    Failure {
        query: String,
        /// The search succeeded but matched nothing.
        zero_result: bool,
        cause: String,
    },
}

crate::impl_state! {
    SearchState { NoSearch, Loading, Success, Failure }
    error: [Failure]
}

impl SearchState {
    pub fn no_search() -> Self {
        Self::NoSearch {
            query: String::new(),
        }
    }

    /// The query this state belongs to.
    pub fn query(&self) -> &str {
        match self {
            Self::NoSearch { query }
            | Self::Loading { query }
            | Self::Success { query, .. }
            | Self::Failure { query, .. } => query,
        }
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            Self::Success { articles, .. } => articles,
            _ => &[],
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::no_search()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchAction {
    InputSearch(String),
}

crate::impl_action!(SearchAction { InputSearch });

impl SearchAction {
    fn text(&self) -> &str {
        let Self::InputSearch(text) = self;
        text
    }
}

fn zero_result_message(query: &str) -> String {
    format!("Looks like we found zero results for {query}")
}

async fn search(provider: Arc<dyn NewsProvider>, query: String) -> HandlerResult<SearchState> {
    debug!(query = %query, "searching news");
    let next = match provider.get_news(&query).await {
        Ok(response) if !response.articles.is_empty() => SearchState::Success {
            query,
            articles: response.articles,
        },
        Ok(_) => SearchState::Failure {
            cause: zero_result_message(&query),
            query,
            zero_result: true,
        },
        Err(err) => {
            warn!(query = %query, error = %err, "news search failed");
            SearchState::Failure {
                query,
                zero_result: false,
                cause: err.to_string(),
            }
        }
    };
    Ok(Decision::Override(next))
}

pub fn builder(
    provider: Arc<dyn NewsProvider>,
    config: &SearchConfig,
    runtime: &RuntimeConfig,
) -> StateMachineBuilder<SearchState, SearchAction> {
    let min_len = config.min_query_len;
    let long_enough = move |text: &str| text.chars().count() >= min_len;

    StateMachineBuilder::<SearchState, SearchAction>::new()
        .label(LABEL)
        .initial(SearchState::no_search())
        .runtime(runtime.clone())
        .in_state("NoSearch", move |spec| {
            spec.on_reduce("InputSearch", move |action, _| {
                let text = action.text();
                if long_enough(text) {
                    Decision::Override(SearchState::Loading {
                        query: text.to_string(),
                    })
                } else {
                    Decision::NoChange
                }
            })
        })
        .in_state("Loading", move |spec| {
            spec.on_enter(move |state: SearchState| {
                search(Arc::clone(&provider), state.query().to_string())
            })
        })
        .in_state("Success", move |spec| {
            spec.on_reduce("InputSearch", move |action, _| {
                let text = action.text();
                if long_enough(text) {
                    Decision::Override(SearchState::Loading {
                        query: text.to_string(),
                    })
                } else {
                    Decision::Override(SearchState::no_search())
                }
            })
        })
        .in_state("Failure", move |spec| {
            spec.on_reduce("InputSearch", move |action, state| {
                let text = action.text();
                if text.is_empty() {
                    return Decision::Override(SearchState::no_search());
                }
                if long_enough(text) {
                    return Decision::Override(SearchState::Loading {
                        query: text.to_string(),
                    });
                }
                // Keep showing the failure while the user is still typing.
                match state {
                    SearchState::Failure {
                        zero_result, cause, ..
                    } => Decision::Mutate(SearchState::Failure {
                        query: text.to_string(),
                        zero_result: *zero_result,
                        cause: cause.clone(),
                    }),
                    _ => Decision::NoChange,
                }
            })
        })
}

pub fn definition(
    provider: Arc<dyn NewsProvider>,
    config: &SearchConfig,
    runtime: &RuntimeConfig,
) -> Result<MachineDefinition<SearchState, SearchAction>, BuildError> {
    builder(provider, config, runtime).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{NewsError, Source, StaticNewsProvider};
    use crate::core::State;
    use std::time::Duration;
    use tokio::time::timeout;

    fn article(title: &str) -> Article {
        Article {
            author: None,
            content: None,
            description: None,
            published_at: None,
            source: Source::default(),
            title: Some(title.to_string()),
            url: None,
            url_to_image: None,
        }
    }

    fn start(
        provider: StaticNewsProvider,
    ) -> (
        crate::effects::StateMachine<SearchState, SearchAction>,
        crate::effects::StateSubscription<SearchState>,
    ) {
        definition(Arc::new(provider), &SearchConfig::default(), &RuntimeConfig::default())
            .unwrap()
            .start_subscribed()
            .unwrap()
    }

    fn input(text: &str) -> SearchAction {
        SearchAction::InputSearch(text.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn short_queries_do_not_search() {
        let (machine, mut states) = start(StaticNewsProvider::with_articles(vec![article("a")]));
        assert_eq!(states.next().await, Some(SearchState::no_search()));

        machine.dispatch(input("ab")).unwrap();
        assert!(timeout(Duration::from_secs(1), states.next()).await.is_err());
        assert_eq!(machine.current_state(), SearchState::no_search());
    }

    #[tokio::test(start_paused = true)]
    async fn search_with_results_succeeds() {
        let articles = vec![article("one"), article("two")];
        let (machine, mut states) = start(
            StaticNewsProvider::with_articles(articles.clone()).with_latency(Duration::from_millis(50)),
        );
        states.next().await;

        machine.dispatch(input("rust")).unwrap();
        assert_eq!(
            states.next().await,
            Some(SearchState::Loading {
                query: "rust".into()
            })
        );
        assert_eq!(
            states.next().await,
            Some(SearchState::Success {
                query: "rust".into(),
                articles
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_a_zero_result_failure() {
        let (machine, mut states) = start(StaticNewsProvider::with_articles(Vec::new()));
        states.next().await;

        machine.dispatch(input("nothing")).unwrap();
        states.next().await;
        assert_eq!(
            states.next().await,
            Some(SearchState::Failure {
                query: "nothing".into(),
                zero_result: true,
                cause: "Looks like we found zero results for nothing".into(),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn provider_error_is_a_failure_with_cause() {
        let (machine, mut states) =
            start(StaticNewsProvider::failing(NewsError::Transport("offline".into())));
        states.next().await;

        machine.dispatch(input("rust")).unwrap();
        states.next().await;
        let Some(SearchState::Failure {
            query,
            zero_result,
            cause,
        }) = states.next().await
        else {
            panic!("expected a failure");
        };
        assert_eq!(query, "rust");
        assert!(!zero_result);
        assert_eq!(cause, "Request failed: offline");
        assert!(machine.current_state().is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_tracks_short_input_then_resets_on_empty() {
        let (machine, mut states) = start(StaticNewsProvider::with_articles(Vec::new()));
        states.next().await;
        machine.dispatch(input("nothing")).unwrap();
        states.next().await;
        states.next().await;

        machine.dispatch(input("ab")).unwrap();
        let Some(SearchState::Failure {
            query, zero_result, ..
        }) = states.next().await
        else {
            panic!("expected the failure to stay");
        };
        assert_eq!(query, "ab");
        assert!(zero_result);

        machine.dispatch(input("")).unwrap();
        assert_eq!(states.next().await, Some(SearchState::no_search()));
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_after_success_clears_results() {
        let (machine, mut states) = start(StaticNewsProvider::with_articles(vec![article("a")]));
        states.next().await;
        machine.dispatch(input("rust")).unwrap();
        states.next().await;
        states.next().await;

        machine.dispatch(input("ab")).unwrap();
        assert_eq!(states.next().await, Some(SearchState::no_search()));
    }

    #[tokio::test(start_paused = true)]
    async fn new_query_after_success_searches_for_it() {
        let (machine, mut states) = start(StaticNewsProvider::with_articles(vec![article("a")]));
        states.next().await;
        machine.dispatch(input("rust")).unwrap();
        states.next().await;
        states.next().await;

        machine.dispatch(input("tokio")).unwrap();
        assert_eq!(
            states.next().await,
            Some(SearchState::Loading {
                query: "tokio".into()
            })
        );
        assert_eq!(states.next().await.map(|s| s.query().to_string()), Some("tokio".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn input_during_loading_is_evaluated_after_the_result() {
        let (machine, mut states) = start(
            StaticNewsProvider::with_articles(vec![article("a")]).with_latency(Duration::from_secs(2)),
        );
        states.next().await;

        machine.dispatch(input("rust")).unwrap();
        machine.dispatch(input("ab")).unwrap();

        assert_eq!(states.next().await.map(|s| s.name()), Some("Loading"));
        assert_eq!(states.next().await.map(|s| s.name()), Some("Success"));
        assert_eq!(states.next().await, Some(SearchState::no_search()));
    }

    #[test]
    fn query_accessor_covers_every_variant() {
        let failure = SearchState::Failure {
            query: "q".into(),
            zero_result: false,
            cause: "c".into(),
        };
        assert_eq!(failure.query(), "q");
        assert!(failure.articles().is_empty());
        assert_eq!(SearchState::default().query(), "");
    }
}
