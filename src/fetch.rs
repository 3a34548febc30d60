use std::time::Duration;

use tracing::info;

use crate::error::PricingError;

const TIMEOUT: Duration = Duration::from_secs(30);

// The page serves a stripped-down shell to obvious bot user agents, so the
// request has to look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetch the pricing page and return its body as text. One request, no
/// retries; a rerun of the whole pipeline is the retry policy.
pub async fn fetch_page(url: &str) -> Result<String, PricingError> {
    let client = reqwest::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|source| PricingError::Fetch {
            url: url.to_string(),
            source,
        })?;

    info!("Fetching {}", url);
    let body = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|source| PricingError::Fetch {
            url: url.to_string(),
            source,
        })?
        .text()
        .await
        .map_err(|source| PricingError::Fetch {
            url: url.to_string(),
            source,
        })?;

    info!("Fetched {} bytes", body.len());
    Ok(body)
}
