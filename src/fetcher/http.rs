use crate::model::FetchError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) JobSniperBot/0.1";

pub fn build_client(timeout_secs: u64) -> Result<Client, FetchError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// GETs `url` and decodes the JSON body, treating any non-2xx status as an error.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, FetchError> {
    debug!("GET {} {:?}", url, query.iter().map(|(k, _)| k).collect::<Vec<_>>());

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(map_send_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::InvalidResponse(status.as_u16()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

fn map_send_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::HttpError(e)
    }
}
