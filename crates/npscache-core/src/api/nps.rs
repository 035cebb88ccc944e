//! Site directory backed by nps.gov pages.
//!
//! The home page links every state listing; a state listing links each
//! site's landing page; the landing page carries the site's name,
//! designation, locality, postal code and phone number.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::{GatewayError, HttpClient, SiteDirectory};
use crate::models::{RawSite, SiteIndex};

/// Base URL for nps.gov
const NPS_BASE_URL: &str = "https://www.nps.gov";

/// Page linking every state listing
const HOME_PATH: &str = "/index.htm";

#[derive(Clone)]
pub struct NpsClient {
    http: HttpClient,
    base_url: String,
}

impl NpsClient {
    pub fn new() -> Result<Self, GatewayError> {
        Ok(Self::with_base_url(HttpClient::new()?, NPS_BASE_URL))
    }

    pub fn with_base_url(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SiteDirectory for NpsClient {
    async fn fetch_state_index(&self) -> Result<SiteIndex, GatewayError> {
        let url = format!("{}{}", self.base_url, HOME_PATH);
        let html = self.http.get_text(&url).await?;
        let index = parse_state_index(&html, &self.base_url)?;
        if index.is_empty() {
            return Err(GatewayError::Extraction {
                what: "state links",
                url,
            });
        }
        debug!(states = index.len(), "Parsed state index");
        Ok(index)
    }

    async fn fetch_sites(&self, locator: &str) -> Result<Vec<RawSite>, GatewayError> {
        let html = self.http.get_text(locator).await?;
        let links = parse_site_links(&html, &self.base_url)?;
        debug!(locator, sites = links.len(), "Parsed site links");

        let mut sites = Vec::with_capacity(links.len());
        for link in links {
            info!(url = %link, "Fetching site page");
            let page = self.http.get_text(&link).await?;
            sites.push(parse_site_page(&page)?);
        }
        Ok(sites)
    }
}

fn selector(css: &str) -> Result<Selector, GatewayError> {
    Selector::parse(css)
        .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse selector {}: {}", css, e)))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>, GatewayError> {
    let selector = selector(css)?;
    Ok(document.select(&selector).next().map(element_text))
}

fn absolute(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}

/// Map each state link on the home page to its listing URL.
///
/// State links look like `/state/mi/index.htm`; the link text is the state name.
pub fn parse_state_index(html: &str, base_url: &str) -> Result<SiteIndex, GatewayError> {
    let document = Html::parse_document(html);
    let links = selector("a[href]")?;

    let mut index = SiteIndex::new();
    for link in document.select(&links) {
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if !is_state_href(href) {
            continue;
        }
        let name = element_text(link);
        if name.trim().is_empty() {
            continue;
        }
        index.insert(&name, absolute(base_url, href));
    }
    Ok(index)
}

fn is_state_href(href: &str) -> bool {
    href.find("/state/")
        .map(|start| {
            let rest = &href[start + "/state/".len()..];
            rest.len() > "/index.htm".len() && rest.ends_with("/index.htm")
        })
        .unwrap_or(false)
}

/// Site landing page URLs from a state listing, in listing order.
pub fn parse_site_links(html: &str, base_url: &str) -> Result<Vec<String>, GatewayError> {
    let document = Html::parse_document(html);
    let links = selector("div.list_left h3 a")?;

    Ok(document
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{}index.htm", absolute(base_url, href.trim())))
        .collect())
}

/// Pull the site fields off a landing page. Absent elements stay `None`.
pub fn parse_site_page(html: &str) -> Result<RawSite, GatewayError> {
    let document = Html::parse_document(html);

    Ok(RawSite {
        name: first_text(&document, "a.Hero-title")?,
        category: first_text(&document, "span.Hero-designation")?,
        locality: first_text(&document, "span[itemprop=addressLocality]")?,
        region: first_text(&document, "span.region")?,
        postal_code: first_text(&document, "span.postal-code")?.map(|z| z.trim_end().to_string()),
        phone: first_text(&document, "span.tel")?.map(|p| p.trim_matches('\n').to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StateName;

    const HOME: &str = r#"
        <html><body>
          <ul class="dropdown-menu">
            <li><a href="/state/mi/index.htm">Michigan</a></li>
            <li><a href=" /state/wy/index.htm ">Wyoming</a></li>
            <li><a href="/state/dc/index.htm">District of Columbia</a></li>
          </ul>
          <a href="/findapark/index.htm">Find a Park</a>
          <a href="/state/index.htm">All</a>
        </body></html>
    "#;

    const STATE_PAGE: &str = r#"
        <div class="col-md-9 col-sm-9 col-xs-12 table-cell list_left">
          <h2>National Park</h2>
          <h3><a href="/isro/">Isle Royale</a></h3>
        </div>
        <div class="col-md-9 col-sm-9 col-xs-12 table-cell list_left">
          <h3><a href="/kewe/">Keweenaw</a></h3>
        </div>
        <div class="sidebar"><h3><a href="/other/">Other</a></h3></div>
    "#;

    const SITE_PAGE: &str = r#"
        <div class="Hero-titleContainer">
          <a class="Hero-title" href="/isro/">Isle Royale</a>
          <span class="Hero-designation">National Park</span>
        </div>
        <p class="adr">
          <span itemprop="addressLocality">Houghton</span>,
          <span class="region">MI</span>
          <span class="postal-code">49931 </span>
        </p>
        <span class="tel">
(906) 482-0984
</span>
    "#;

    #[test]
    fn test_parse_state_index() {
        let index = parse_state_index(HOME, "https://www.nps.gov").unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.locator(&StateName::new("Michigan")),
            Some("https://www.nps.gov/state/mi/index.htm")
        );
        assert_eq!(
            index.locator(&StateName::new("wyoming")),
            Some("https://www.nps.gov/state/wy/index.htm")
        );
        assert!(index.contains(&StateName::new("district of columbia")));
    }

    #[test]
    fn test_is_state_href() {
        assert!(is_state_href("/state/mi/index.htm"));
        assert!(!is_state_href("/state/index.htm"));
        assert!(!is_state_href("/findapark/index.htm"));
    }

    #[test]
    fn test_parse_site_links_in_order() {
        let links = parse_site_links(STATE_PAGE, "https://www.nps.gov").unwrap();
        assert_eq!(
            links,
            vec![
                "https://www.nps.gov/isro/index.htm".to_string(),
                "https://www.nps.gov/kewe/index.htm".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_site_page() {
        let raw = parse_site_page(SITE_PAGE).unwrap();
        assert_eq!(raw.name.as_deref(), Some("Isle Royale"));
        assert_eq!(raw.category.as_deref(), Some("National Park"));
        assert_eq!(raw.postal_code.as_deref(), Some("49931"));

        let record = raw.into_record();
        assert_eq!(record.address, "Houghton, MI");
        assert_eq!(record.phone, "(906) 482-0984");
    }

    #[test]
    fn test_parse_site_page_without_address() {
        let raw = parse_site_page(
            r#"<a class="Hero-title">Lewis and Clark</a><span class="tel">555</span>"#,
        )
        .unwrap();
        assert!(raw.category.is_none());
        assert!(raw.postal_code.is_none());

        let record = raw.into_record();
        assert_eq!(record.category, "");
        assert_eq!(record.address, "");
        assert_eq!(record.postal_code, "");
    }
}
