//! Shared plumbing for talking to the JSON API.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{CartError, ErrorCode};

/// Body of every non-2xx response from the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

pub(crate) fn client(timeout: Duration) -> Result<Client, CartError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

pub(crate) fn join(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}

/// Decode a successful response as `T`, or the uniform error body as a [`CartError`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CartError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await?;

        return Err(decode_error(status.as_u16(), &body));
    }

    response.json::<T>().await.map_err(|source| {
        CartError::new(
            ErrorCode::InternalError,
            format!("unexpected response from the API: {source}"),
        )
    })
}

fn decode_error(status: u16, body: &str) -> CartError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error, code }) => {
            let code = code
                .parse()
                .unwrap_or_else(|_unknown| ErrorCode::from_status(status));

            CartError::new(code, error)
        }
        Err(_) => CartError::new(
            ErrorCode::from_status(status),
            format!("request failed with status {status}"),
        ),
    }
}
