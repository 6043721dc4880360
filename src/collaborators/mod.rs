//! External collaborators consumed by the sample machines.
//!
//! Machines receive these as shared `Arc<dyn ...>` values at construction and
//! only ever read from them.

mod connectivity;
mod news;

pub use connectivity::{ConnectionState, ConnectivityProvider, SharedConnectivity};
pub use news::{
    Article, HttpNewsProvider, NewsError, NewsProvider, NewsResponse, Source, StaticNewsProvider,
};
