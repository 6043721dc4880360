//! Types a query into the news search screen character by character.
//!
//! Uses NewsAPI when `NEWS_API_KEY` is set and canned articles otherwise.
//!
//! ```text
//! NEWS_API_KEY=... cargo run --example news_search -- "rust language"
//! ```

use reflow::collaborators::{
    Article, HttpNewsProvider, NewsProvider, Source, StaticNewsProvider,
};
use reflow::config::ReflowConfig;
use reflow::logging;
use reflow::machines::{activity, news_search, ActivityAction, SearchState, WindowWidthSizeClass};
use reflow::viewmodel::NewsSearchViewModel;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn canned_articles() -> Vec<Article> {
    ["Rust 2024 edition ships", "Async closures stabilised"]
        .into_iter()
        .map(|title| Article {
            author: Some("Demo Desk".to_string()),
            content: None,
            description: None,
            published_at: None,
            source: Source {
                id: None,
                name: Some("Offline".to_string()),
            },
            title: Some(title.to_string()),
            url: None,
            url_to_image: None,
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default();
    let config = ReflowConfig::load()?;
    let query = std::env::args().nth(1).unwrap_or_else(|| "rust".to_string());

    let provider: Arc<dyn NewsProvider> = if config.news.api_key.is_some() {
        Arc::new(HttpNewsProvider::new(config.news.clone())?)
    } else {
        info!("NEWS_API_KEY not set; using canned articles");
        Arc::new(StaticNewsProvider::with_articles(canned_articles()).with_latency(Duration::from_millis(300)))
    };

    let activity = activity::definition(&config.runtime)?.start()?;
    let search = news_search::definition(provider, &config.search, &config.runtime)?.start()?;
    let view_model = NewsSearchViewModel::new(activity, search, config.search.debounce());
    view_model.dispatch_activity(ActivityAction::WindowSizeChanged(WindowWidthSizeClass::Expanded))?;

    let mut ui = view_model.watch();
    for end in 1..=query.chars().count() {
        let typed: String = query.chars().take(end).collect();
        view_model.input_text(typed);
        tokio::time::sleep(Duration::from_millis(80)).await;
    }

    let settled = tokio::time::timeout(
        config.news.timeout() + Duration::from_secs(1),
        ui.wait_for(|ui| matches!(ui.search, SearchState::Success { .. } | SearchState::Failure { .. })),
    )
    .await??
    .clone();

    match settled.search {
        SearchState::Success { query, articles } => {
            println!("{} article(s) for {query:?}", articles.len());
            for article in articles {
                println!(
                    "- {} ({})",
                    article.title.unwrap_or_default(),
                    article.source.name.unwrap_or_default()
                );
            }
        }
        SearchState::Failure { query, cause, .. } => println!("search for {query:?} failed: {cause}"),
        other => println!("unexpected state: {other:?}"),
    }
    Ok(())
}
