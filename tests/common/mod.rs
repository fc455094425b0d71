//! In-memory browser for tests
//!
//! Serves a fake directory listing plus one detail page per company, and keeps
//! counters of open pages and an ordered event log so tests can check
//! concurrency and page release.

#![allow(dead_code)]

use async_trait::async_trait;
use founder_scraper::{BrowserError, BrowserSession, Config, DomElement, PageContext, Selectors};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ENTRY_URL: &str = "https://dir.test/companies";

pub fn detail_url(slug: &str) -> String {
    format!("https://dir.test/companies/{}", slug)
}

/// A rendered element: text, attributes, and children keyed by selector
#[derive(Clone, Debug, Default)]
pub struct FakeNode {
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub children: Vec<(String, FakeNode)>,
}

impl FakeNode {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, node: FakeNode) -> Self {
        self.children.push((selector.to_string(), node));
        self
    }
}

#[derive(Clone, Debug)]
pub enum FakeRoute {
    /// Cards appear `per_scroll` at a time after the first `initial`
    Listing {
        cards: Vec<FakeNode>,
        initial: usize,
        per_scroll: usize,
    },
    Detail {
        blocks: Vec<FakeNode>,
        load_time: Duration,
    },
    /// Loads, then every query fails as if the tab died
    DetailClosed,
    /// Navigation fails outright
    Broken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Navigate(String),
    Close(String),
}

#[derive(Default)]
pub struct Stats {
    pub open_now: AtomicUsize,
    pub max_open: AtomicUsize,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub events: Mutex<Vec<Event>>,
}

impl Stats {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

struct Inner {
    routes: HashMap<String, FakeRoute>,
    selectors: Selectors,
    stats: Stats,
}

#[derive(Clone)]
pub struct FakeBrowser {
    inner: Arc<Inner>,
}

impl FakeBrowser {
    pub fn new(routes: HashMap<String, FakeRoute>) -> Self {
        Self {
            inner: Arc::new(Inner {
                routes,
                selectors: Selectors::default(),
                stats: Stats::default(),
            }),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.inner.stats
    }
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    type Page = FakePage;

    async fn open_page(&self) -> Result<FakePage, BrowserError> {
        let stats = &self.inner.stats;
        let now = stats.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        stats.max_open.fetch_max(now, Ordering::SeqCst);
        stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage {
            inner: self.inner.clone(),
            state: Mutex::new(PageState::default()),
        })
    }
}

#[derive(Default)]
struct PageState {
    url: String,
    revealed: usize,
}

pub struct FakePage {
    inner: Arc<Inner>,
    state: Mutex<PageState>,
}

impl FakePage {
    fn route(&self) -> Option<&FakeRoute> {
        let url = self.state.lock().unwrap().url.clone();
        self.inner.routes.get(&url)
    }
}

#[async_trait]
impl PageContext for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.inner.stats.push(Event::Navigate(url.to_string()));
        self.state.lock().unwrap().url = url.to_string();

        match self.inner.routes.get(url) {
            None | Some(FakeRoute::Broken) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
            Some(FakeRoute::Listing { cards, initial, .. }) => {
                self.state.lock().unwrap().revealed = (*initial).min(cards.len());
                Ok(())
            }
            Some(FakeRoute::Detail { load_time, .. }) => {
                if *load_time > timeout {
                    tokio::time::sleep(timeout).await;
                    return Err(BrowserError::NavigationTimeout {
                        url: url.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                tokio::time::sleep(*load_time).await;
                Ok(())
            }
            Some(FakeRoute::DetailClosed) => Ok(()),
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>, BrowserError> {
        let selectors = &self.inner.selectors;
        match self.route() {
            Some(FakeRoute::Listing { cards, .. }) if selector == selectors.card => {
                let revealed = self.state.lock().unwrap().revealed;
                Ok(cards[..revealed].iter().cloned().map(FakeElement).collect())
            }
            Some(FakeRoute::Detail { blocks, .. }) if selector == selectors.founder_block => {
                Ok(blocks.iter().cloned().map(FakeElement).collect())
            }
            Some(FakeRoute::DetailClosed) => Err(BrowserError::PageClosed),
            _ => Ok(Vec::new()),
        }
    }

    async fn scroll_by(&self, _delta_y: f64) -> Result<(), BrowserError> {
        self.inner.stats.scrolls.fetch_add(1, Ordering::SeqCst);
        if let Some(FakeRoute::Listing { cards, per_scroll, .. }) = self.route() {
            let mut state = self.state.lock().unwrap();
            state.revealed = (state.revealed + per_scroll).min(cards.len());
        }
        Ok(())
    }

    async fn close(self) -> Result<(), BrowserError> {
        let stats = &self.inner.stats;
        let url = self.state.lock().unwrap().url.clone();
        stats.push(Event::Close(url));
        stats.open_now.fetch_sub(1, Ordering::SeqCst);
        stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeElement(FakeNode);

#[async_trait]
impl DomElement for FakeElement {
    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>, BrowserError> {
        Ok(self
            .0
            .children
            .iter()
            .filter(|(key, _)| key == selector)
            .map(|(_, node)| FakeElement(node.clone()))
            .collect())
    }

    async fn inner_text(&self) -> Result<String, BrowserError> {
        Ok(self.0.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.0.attrs.get(name).cloned())
    }
}

/// One company in the fake directory
#[derive(Clone, Debug)]
pub struct FakeCompany {
    pub slug: String,
    pub name: String,
    pub batch: Option<String>,
    pub description: Option<String>,
    pub has_link: bool,
    pub founders: Vec<(Option<String>, Option<String>)>,
    pub load_time: Duration,
    pub route_override: Option<FakeRoute>,
}

/// Company `i` with two fully populated founders
pub fn company(i: usize) -> FakeCompany {
    let slug = format!("company-{:02}", i);
    FakeCompany {
        name: format!("Company {:02}", i),
        batch: Some("W24".to_string()),
        description: Some(format!("Description {}", i)),
        has_link: true,
        founders: vec![
            (
                Some(format!("Founder A{}", i)),
                Some(format!("https://www.linkedin.com/in/a{}", i)),
            ),
            (
                Some(format!("Founder B{}", i)),
                Some(format!("https://www.linkedin.com/in/b{}", i)),
            ),
        ],
        load_time: Duration::from_secs(1),
        route_override: None,
        slug,
    }
}

pub fn card_node(c: &FakeCompany) -> FakeNode {
    let s = Selectors::default();
    let mut node = FakeNode::default();
    if !c.name.is_empty() {
        node = node.child(&s.card_name, FakeNode::text(&c.name));
    }
    if let Some(batch) = &c.batch {
        node = node.child(&s.card_batch, FakeNode::text(batch));
    }
    if let Some(desc) = &c.description {
        node = node.child(&s.card_description, FakeNode::text(desc));
    }
    if c.has_link {
        node = node.attr("href", &format!("/companies/{}", c.slug));
    }
    node
}

pub fn founder_block(name: Option<&str>, link: Option<&str>) -> FakeNode {
    let s = Selectors::default();
    let mut node = FakeNode::default();
    if let Some(name) = name {
        node = node.child(&s.founder_name, FakeNode::text(name));
    }
    if let Some(link) = link {
        node = node.child(&s.founder_link, FakeNode::default().attr("href", link));
    }
    node
}

/// Listing plus detail pages for `companies`; cards load 5 per scroll
pub fn directory(companies: &[FakeCompany]) -> FakeBrowser {
    let mut routes = HashMap::new();
    routes.insert(
        ENTRY_URL.to_string(),
        FakeRoute::Listing {
            cards: companies.iter().map(card_node).collect(),
            initial: 5,
            per_scroll: 5,
        },
    );
    for c in companies {
        let route = c.route_override.clone().unwrap_or_else(|| FakeRoute::Detail {
            blocks: c
                .founders
                .iter()
                .map(|(name, link)| founder_block(name.as_deref(), link.as_deref()))
                .collect(),
            load_time: c.load_time,
        });
        routes.insert(detail_url(&c.slug), route);
    }
    FakeBrowser::new(routes)
}

/// Unique output file under the system temp dir
pub fn temp_output(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("founder_scraper_tests_{}", std::process::id()));
    let path = dir.join(format!("{}.csv", test_name));
    let _ = std::fs::remove_file(&path);
    path
}

pub fn test_config(output: &Path) -> Config {
    Config {
        entry_url: ENTRY_URL.to_string(),
        output_path: output.display().to_string(),
        ..Config::default()
    }
}

/// Data rows of a csv file (header skipped)
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
