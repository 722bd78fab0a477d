use anyhow::{Context, Result};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::api::append_segment;

const PAGE_URL: &str = "https://www.dictionary.com/browse/";

/// Container of the inflected word forms on a dictionary.com entry page.
const WORD_FORM_BOX: &str = "div.expandable.content-hidden.css-12x6sdt.e1fc5zsj0";
const WORD_FORM_ITEM: &str = "span.luna-runon.bold";

/// Container of the definition blocks, each labelled with a part of speech.
const DEFINITION_BOX: &str = "div.css-1avshm7.e16867sm0";
const POS_ITEM: &str = "span.luna-pos";

/// Auxiliary data scraped from a dictionary entry page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageData {
    /// Inflected forms, e.g. "ran", "running".
    pub word_forms: Vec<String>,
    /// Part-of-speech labels in page order.
    pub parts_of_speech: Vec<String>,
}

/// Something that can provide page data for a term.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn page_data(&self, term: &str) -> Result<PageData>;
}

/// dictionary.com entry pages.
pub struct DictionaryPage {
    client: reqwest::Client,
    base_url: Url,
}

impl DictionaryPage {
    pub fn new(client: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(PAGE_URL).context("Invalid page URL")?;
        Ok(Self { client, base_url })
    }

    pub fn page_url(&self, term: &str) -> Url {
        append_segment(&self.base_url, term.trim())
    }

    async fn fetch_page(&self, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .context("Failed to fetch page")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        response.text().await.context("Failed to read response body")
    }
}

impl PageSource for DictionaryPage {
    async fn page_data(&self, term: &str) -> Result<PageData> {
        let url = self.page_url(term);
        tracing::info!(url = %url, "Getting page data");
        let html = self.fetch_page(url).await?;
        tracing::debug!(bytes = html.len(), "Received HTML");
        Ok(parse_page(&html))
    }
}

/// Extract word forms and part-of-speech labels from an entry page.
///
/// The selectors target one specific page layout. When a container is
/// missing the corresponding list is empty; this is not an error.
pub fn parse_page(html: &str) -> PageData {
    let document = Html::parse_document(html);

    let word_forms = select_texts(&document, WORD_FORM_BOX, WORD_FORM_ITEM);
    for form in &word_forms {
        tracing::debug!(form = %form, "Parsed word form");
    }

    PageData {
        word_forms,
        parts_of_speech: select_texts(&document, DEFINITION_BOX, POS_ITEM),
    }
}

/// Trimmed text of every `item` inside the first `container`.
fn select_texts(document: &Html, container: &str, item: &str) -> Vec<String> {
    let container_sel = Selector::parse(container).expect("valid selector");
    let item_sel = Selector::parse(item).expect("valid selector");

    let Some(root) = document.select(&container_sel).next() else {
        tracing::debug!(selector = container, "Container not found on page");
        return Vec::new();
    };

    root.select(&item_sel)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
