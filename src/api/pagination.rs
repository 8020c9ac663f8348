//! Page-by-page listing and draining into one collection

use async_trait::async_trait;
use reqwest::header::LINK;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use super::client::decode;
use super::FastlyClient;
use crate::error::{FastlyError, Result};

/// A cursor over a paginated listing.
#[async_trait]
pub trait PageSource<T: Send>: Send {
    fn has_next(&self) -> bool;

    async fn get_next(&mut self) -> Result<Vec<T>>;

    /// Pages not yet fetched, when the source knows.
    fn remaining(&self) -> Option<usize>;
}

/// Outcome of draining a page source. Items collected before an error are kept.
#[derive(Debug)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pages_remaining: Option<usize>,
    pub err: Option<FastlyError>,
}

impl<T> PageResult<T> {
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.err {
            None => Ok(self.items),
            Some(err) => Err(FastlyError::Pagination {
                pages_remaining: self.pages_remaining,
                source: Box::new(err),
            }),
        }
    }
}

/// Fetch every page in order, stopping at the first error.
pub async fn drain_all<T, P>(source: &mut P) -> PageResult<T>
where
    T: Send,
    P: PageSource<T> + ?Sized,
{
    let mut items = Vec::new();
    while source.has_next() {
        match source.get_next().await {
            Ok(page) => {
                tracing::debug!(count = page.len(), "fetched page");
                items.extend(page);
            }
            Err(err) => {
                return PageResult {
                    items,
                    pages_remaining: source.remaining(),
                    err: Some(err),
                };
            }
        }
    }
    PageResult { items, pages_remaining: Some(0), err: None }
}

// ============ HTTP page source ============

/// Walks a list endpoint with `page`/`per_page`, following `Link: rel="next"`.
pub struct Paginator<T> {
    client: FastlyClient,
    path: String,
    per_page: u32,
    next_page: Option<u32>,
    last_page: Option<u32>,
    fetched: u32,
    _item: PhantomData<fn() -> T>,
}

impl<T> Paginator<T> {
    pub fn new(client: FastlyClient, path: &str, per_page: u32) -> Self {
        Self {
            client,
            path: path.to_string(),
            per_page: per_page.max(1),
            next_page: Some(1),
            last_page: None,
            fetched: 0,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PageSource<T> for Paginator<T>
where
    T: DeserializeOwned + Send,
{
    fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    async fn get_next(&mut self) -> Result<Vec<T>> {
        let page = match self.next_page {
            Some(page) => page,
            None => return Ok(Vec::new()),
        };

        let req = self
            .client
            .request(Method::GET, &self.path)
            .query(&[("page", page), ("per_page", self.per_page)]);
        let resp = self.client.send_raw(req).await?;

        let links = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();
        let items: Vec<T> = decode(resp).await?;

        self.fetched = page;
        self.next_page = links.next.filter(|next| *next > page);
        if links.last.is_some() {
            self.last_page = links.last;
        }
        Ok(items)
    }

    fn remaining(&self) -> Option<usize> {
        if self.next_page.is_none() {
            return Some(0);
        }
        self.last_page
            .map(|last| last.saturating_sub(self.fetched) as usize)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Links {
    next: Option<u32>,
    last: Option<u32>,
}

/// Extracts the `page` numbers of the `next` and `last` relations.
fn parse_link_header(header: &str) -> Links {
    let mut links = Links::default();
    let base = match Url::parse("http://localhost/") {
        Ok(base) => base,
        Err(_) => return links,
    };

    for part in header.split(',') {
        let mut segments = part.split(';');
        let target = match segments.next() {
            Some(t) => t.trim().trim_start_matches('<').trim_end_matches('>'),
            None => continue,
        };
        let rel = segments
            .filter_map(|s| s.trim().strip_prefix("rel="))
            .map(|r| r.trim_matches('"'))
            .next();

        let page = base.join(target).ok().and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse::<u32>().ok())
        });

        match rel {
            Some("next") => links.next = page,
            Some("last") => links.last = page,
            _ => {}
        }
    }
    links
}
