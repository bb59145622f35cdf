use futures::future::try_join_all;

use crate::server::{
    error::upstream::UpstreamError,
    model::upstream::{PageEnvelope, UpstreamResource},
    service::upstream::JsonFetcher,
};

/// Resolves every page of a paginated upstream listing.
pub struct PaginationResolver<'a> {
    fetcher: &'a dyn JsonFetcher,
}

impl<'a> PaginationResolver<'a> {
    pub fn new(fetcher: &'a dyn JsonFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch all pages of the listing starting at `first_page_url`.
    ///
    /// Page 1 is fetched first to learn the page count; pages `2..=pages` are then fetched
    /// concurrently. Results are concatenated in page order regardless of which page finished
    /// first.
    ///
    /// The fan-out fails fast: the first page that exhausts its retries fails the whole
    /// resolution and the remaining in-flight fetches are dropped. No partial result is ever
    /// returned.
    pub async fn resolve<T: UpstreamResource>(
        &self,
        first_page_url: &str,
    ) -> Result<Vec<T>, UpstreamError> {
        let first_page: PageEnvelope<T> = self.fetch_page(first_page_url).await?;

        if first_page.info.next.is_none() {
            tracing::debug!(
                "Resolved {} {} records from a single page",
                first_page.results.len(),
                T::KIND
            );

            return Ok(first_page.results);
        }

        let page_count = first_page.info.pages;
        let page_urls = (2..=page_count)
            .map(|page| page_url(first_page_url, page))
            .collect::<Result<Vec<_>, _>>()?;

        let remaining_pages: Vec<PageEnvelope<T>> =
            try_join_all(page_urls.iter().map(|url| self.fetch_page(url))).await?;

        let mut results = first_page.results;
        for page in remaining_pages {
            results.extend(page.results);
        }

        tracing::debug!(
            "Resolved {} {} records across {} pages",
            results.len(),
            T::KIND,
            page_count
        );

        Ok(results)
    }

    async fn fetch_page<T: UpstreamResource>(
        &self,
        url: &str,
    ) -> Result<PageEnvelope<T>, UpstreamError> {
        let body = self.fetcher.fetch_json(url).await?;

        serde_json::from_value(body).map_err(|source| UpstreamError::MalformedPage {
            url: url.to_string(),
            source,
        })
    }
}

/// Append `page=<page>` to the query string of `base`.
pub fn page_url(base: &str, page: u32) -> Result<String, UpstreamError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| UpstreamError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("page", &page.to_string());

    Ok(url.to_string())
}
