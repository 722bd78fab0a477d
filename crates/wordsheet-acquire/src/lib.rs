pub mod api;
pub mod page;
pub mod input;
pub mod sink;
pub mod pipeline;

pub use api::{AttemptError, DefinitionSource, DictionaryApi, FetchError, Fetched, RetryPolicy};
pub use page::{DictionaryPage, PageData, PageSource};
pub use sink::{Quoting, RowSink};

const USER_AGENT: &str = concat!("wordsheet/", env!("CARGO_PKG_VERSION"), " (definition lookup tool)");

/// Shared HTTP client for the API and page collaborators.
pub fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}
