//! Sitemap resolution
//!
//! A sitemap is either a `urlset` listing page locations or a
//! `sitemapindex` pointing at further sitemaps. Indexes are followed
//! recursively until only page locations remain.
//!
//! There is no cycle detection: an index that references itself recurses
//! until the process is stopped.

use crate::crawler::RequestClient;
use crate::{Result, ValidatorError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Reasons a sitemap document could not be parsed
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected root element <{0}>, expected <urlset> or <sitemapindex>")]
    UnexpectedRoot(String),

    #[error("document has no root element")]
    Empty,
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapNode {
    /// `<urlset>`: page locations, in document order
    UrlSet(Vec<String>),

    /// `<sitemapindex>`: child sitemap locations, in document order
    Index(Vec<String>),
}

impl SitemapNode {
    fn entry_element(&self) -> &'static [u8] {
        match self {
            Self::UrlSet(_) => b"url",
            Self::Index(_) => b"sitemap",
        }
    }

    fn push(&mut self, loc: String) {
        match self {
            Self::UrlSet(locs) | Self::Index(locs) => locs.push(loc),
        }
    }
}

/// Parses a sitemap XML document
///
/// Namespace prefixes are ignored; only local element names are compared.
/// A `loc` is taken from `urlset/url/loc` or `sitemapindex/sitemap/loc`;
/// a single `<sitemap>` child and a list of them are handled the same way.
///
/// # Returns
///
/// * `Ok(SitemapNode)` - The document kind and its locations
/// * `Err(SitemapError)` - Malformed XML, an unknown root element, or no
///   root at all
pub fn parse_sitemap(xml: &str) -> std::result::Result<SitemapNode, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut node: Option<SitemapNode> = None;
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut loc = String::new();

    loop {
        let in_loc = match &node {
            Some(n) => stack.len() == 3 && stack[1] == n.entry_element() && stack[2] == b"loc",
            None => false,
        };

        match reader.read_event() {
            Ok(Event::Start(element)) => {
                let name = element.local_name().as_ref().to_vec();
                if stack.is_empty() {
                    node = Some(root_node(&name)?);
                }
                if name == b"loc" {
                    loc.clear();
                }
                stack.push(name);
            }
            Ok(Event::Empty(element)) => {
                if stack.is_empty() {
                    node = Some(root_node(element.local_name().as_ref())?);
                }
            }
            Ok(Event::Text(text)) if in_loc => {
                loc.push_str(&text.unescape()?);
            }
            Ok(Event::CData(data)) if in_loc => {
                loc.push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Ok(Event::End(_)) => {
                if in_loc {
                    let value = loc.trim();
                    if let (Some(n), false) = (node.as_mut(), value.is_empty()) {
                        n.push(value.to_string());
                    }
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
    }

    node.ok_or(SitemapError::Empty)
}

fn root_node(name: &[u8]) -> std::result::Result<SitemapNode, SitemapError> {
    match name {
        b"urlset" => Ok(SitemapNode::UrlSet(Vec::new())),
        b"sitemapindex" => Ok(SitemapNode::Index(Vec::new())),
        other => Err(SitemapError::UnexpectedRoot(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;

/// Resolves a sitemap URL into a flat list of page URLs
///
/// Pages are appended to `accumulated` in document order. Child sitemaps of
/// an index are resolved depth-first in document order, threading the list
/// through each call so no branch loses earlier results. Duplicates are kept
/// here and removed by the coordinator before partitioning.
///
/// Sitemap fetches go through the [`RequestClient`], so transient failures
/// are retried. Any fetch failure, non-2xx status or parse error aborts the
/// resolution.
pub fn resolve_sitemap<'a>(
    client: &'a RequestClient,
    sitemap_url: &'a str,
    accumulated: Vec<String>,
) -> ResolveFuture<'a> {
    Box::pin(async move {
        let mut urls = accumulated;

        tracing::debug!("Fetching sitemap {}", sitemap_url);
        let response = client.fetch(sitemap_url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidatorError::SitemapStatus {
                url: sitemap_url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let node = parse_sitemap(&body).map_err(|source| ValidatorError::Sitemap {
            url: sitemap_url.to_string(),
            source,
        })?;

        match node {
            SitemapNode::UrlSet(pages) => {
                tracing::debug!("Sitemap {} lists {} pages", sitemap_url, pages.len());
                urls.extend(pages);
            }
            SitemapNode::Index(children) => {
                tracing::debug!(
                    "Sitemap index {} references {} sitemaps",
                    sitemap_url,
                    children.len()
                );
                for child in &children {
                    urls = resolve_sitemap(client, child, urls).await?;
                }
            }
        }

        Ok(urls)
    })
}
