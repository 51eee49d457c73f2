use super::{FetchError, SourceFetcher};
use crate::settings::ExplorerSettings;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use ethers_core::{types::Address, utils::to_checksum};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Scrapes contract sources from the address pages of a block explorer.
pub struct ExplorerFetcher {
    client: reqwest::Client,
    base_url: Url,
    selector: Selector,
}

impl ExplorerFetcher {
    pub fn new(settings: &ExplorerSettings) -> anyhow::Result<Self> {
        let selector = Selector::parse(&settings.source_selector).map_err(|err| {
            anyhow!(
                "invalid source selector '{}': {:?}",
                settings.source_selector,
                err
            )
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .context("http client initialization failed")?;

        Ok(Self {
            client,
            base_url: settings.url.clone(),
            selector,
        })
    }

    pub fn address_url(&self, address: &Address) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("address/{}", to_checksum(address, None)))
    }
}

#[async_trait]
impl SourceFetcher for ExplorerFetcher {
    async fn fetch_source(&self, address: &Address) -> Result<String, FetchError> {
        let url = self.address_url(address)?;
        log::debug!("fetching {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_source(&body, &self.selector)
    }
}

/// Takes the first text node of the first element matching `selector`
/// and decodes the html entities left in it.
pub fn extract_source(html: &str, selector: &Selector) -> Result<String, FetchError> {
    let document = Html::parse_document(html);
    let element = document
        .select(selector)
        .next()
        .ok_or(FetchError::NotFound)?;
    let text: &str = element
        .first_child()
        .and_then(|node| node.value().as_text())
        .ok_or(FetchError::EmptyContent)?;
    Ok(html_escape::decode_html_entities(text).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const ADDRESS: &str = "56ba2ee7890461f463f7be02aac3099f6d5811a8";

    fn editor() -> Selector {
        Selector::parse("#editor").unwrap()
    }

    fn page(editor: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head><title>Contract</title></head>
<body>
<div class="card">
{editor}
</div>
</body>
</html>"#
        )
    }

    fn settings(url: &str) -> ExplorerSettings {
        ExplorerSettings {
            url: Url::parse(url).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn extract_decodes_entities() {
        let html = page(
            r#"<pre class="js-sourcecopyarea editor" id="editor">pragma solidity ^0.4.18;
contract Token {
    function ok(uint a, uint b) returns (bool) { return a &lt; b &amp;&amp; b &gt; 0; }
}</pre>"#,
        );
        let source = extract_source(&html, &editor()).unwrap();
        assert_eq!(
            source,
            "pragma solidity ^0.4.18;\ncontract Token {\n    function ok(uint a, uint b) returns (bool) { return a < b && b > 0; }\n}"
        );
    }

    #[test]
    fn extract_decodes_escaped_entities() {
        let html = page(r#"<pre id="editor">string s = &quot;&amp;lt;tag&amp;gt;&quot;;</pre>"#);
        let source = extract_source(&html, &editor()).unwrap();
        assert_eq!(source, r#"string s = "<tag>";"#);
    }

    #[test]
    fn extract_takes_first_match() {
        let html = page(r#"<pre class="editor">first</pre><pre class="editor">second</pre>"#);
        let selector = Selector::parse(".editor").unwrap();
        assert_eq!(extract_source(&html, &selector).unwrap(), "first");
    }

    #[test]
    fn extract_not_found() {
        let html = page(r#"<pre id="code">contract A {}</pre>"#);
        let err = extract_source(&html, &editor()).unwrap_err();
        assert!(matches!(err, FetchError::NotFound), "{err:?}");
    }

    #[test]
    fn extract_empty_content() {
        for editor_html in [
            r#"<pre id="editor"></pre>"#,
            r#"<div id="editor"><span>contract A {}</span></div>"#,
        ] {
            let err = extract_source(&page(editor_html), &editor()).unwrap_err();
            assert!(
                matches!(err, FetchError::EmptyContent),
                "{editor_html}: {err:?}"
            );
        }
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let mut settings = settings("https://etherscan.io/");
        settings.source_selector = "#".to_string();
        assert!(ExplorerFetcher::new(&settings).is_err());
    }

    #[test]
    fn address_url_is_checksummed() {
        let fetcher = ExplorerFetcher::new(&settings("https://etherscan.io/")).unwrap();
        let address = Address::from_str(ADDRESS).unwrap();
        let url = fetcher.address_url(&address).unwrap();

        assert_eq!(
            url.as_str(),
            format!("https://etherscan.io/address/{}", to_checksum(&address, None))
        );
        assert_eq!(
            url.as_str().to_lowercase(),
            format!("https://etherscan.io/address/0x{ADDRESS}")
        );
    }

    #[test]
    fn address_url_keeps_base_path() {
        let fetcher =
            ExplorerFetcher::new(&settings("https://explorer.example/mainnet/")).unwrap();
        let address = Address::from_str(ADDRESS).unwrap();
        let url = fetcher.address_url(&address).unwrap();
        assert_eq!(
            url.path().to_lowercase(),
            format!("/mainnet/address/0x{ADDRESS}")
        );
    }

    #[tokio::test]
    async fn fetch_source_from_page() {
        let mock_server = MockServer::start().await;
        let address = Address::from_str(ADDRESS).unwrap();

        Mock::given(method("GET"))
            .and(path(format!("/address/{}", to_checksum(&address, None))))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page(r#"<pre id="editor">contract A { }</pre>"#)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = ExplorerFetcher::new(&settings(&mock_server.uri())).unwrap();
        let source = fetcher.fetch_source(&address).await.unwrap();
        assert_eq!(source, "contract A { }");
    }

    #[tokio::test]
    async fn fetch_source_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = ExplorerFetcher::new(&settings(&mock_server.uri())).unwrap();
        let err = fetcher
            .fetch_source(&Address::from_str(ADDRESS).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn fetch_source_missing_element() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page("<p>no code</p>")))
            .mount(&mock_server)
            .await;

        let fetcher = ExplorerFetcher::new(&settings(&mock_server.uri())).unwrap();
        let err = fetcher
            .fetch_source(&Address::from_str(ADDRESS).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound), "{err:?}");
    }

    #[tokio::test]
    async fn fetch_source_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page(r#"<pre id="editor">contract A { }</pre>"#))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let mut settings = settings(&mock_server.uri());
        settings.request_timeout = Some(1);
        let fetcher = ExplorerFetcher::new(&settings).unwrap();
        let err = fetcher
            .fetch_source(&Address::from_str(ADDRESS).unwrap())
            .await
            .unwrap_err();
        match err {
            FetchError::Transport(err) => assert!(err.is_timeout(), "{err:?}"),
            err => panic!("expected transport error, got {err:?}"),
        }
    }
}
