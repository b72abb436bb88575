use super::{AddResponse, ErrorBody, LibraryApi, LibraryItem, Tag};
use crate::error::ArrError;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::marker::PhantomData;
use tracing::debug;

const API_SLUG: &str = "api/v3";
const API_KEY_HEADER: &str = "x-api-key";

/// Blocking client for one manager, typed by the resource it stores.
pub struct ArrClient<T> {
    client: Client,
    url: String,
    _item: PhantomData<T>,
}

impl<T: LibraryItem> ArrClient<T> {
    pub fn new(url: &str, api_key: &str) -> Result<Self, ArrError> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_| ArrError::InvalidApiKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        Ok(Self {
            client: Client::builder().default_headers(headers).build()?,
            url: url.trim_end_matches('/').to_string(),
            _item: PhantomData,
        })
    }

    fn endpoint(&self, url_slug: &str) -> String {
        format!("{}/{}/{}", self.url, API_SLUG, url_slug)
    }

    fn send_get_request(&self, url_slug: &str, query: &[(&str, String)]) -> Result<Exchange, ArrError> {
        let url = self.endpoint(url_slug);
        let resp = self.client.get(&url).query(query).send()?;
        Exchange::read(format!("GET {}", url), resp)
    }

    fn send_post_request<B: Serialize>(&self, url_slug: &str, body: &B) -> Result<Exchange, ArrError> {
        let url = self.endpoint(url_slug);
        let resp = self.client.post(&url).json(body).send()?;
        Exchange::read(format!("POST {}", url), resp)
    }

    fn send_put_request<B: Serialize>(&self, url_slug: &str, body: &B) -> Result<Exchange, ArrError> {
        let url = self.endpoint(url_slug);
        let resp = self.client.put(&url).json(body).send()?;
        Exchange::read(format!("PUT {}", url), resp)
    }
}

/// A finished request with its body read to a string.
struct Exchange {
    request: String,
    status: u16,
    body: String,
}

impl Exchange {
    fn read(request: String, resp: Response) -> Result<Self, ArrError> {
        let status = resp.status().as_u16();
        let body = resp.text()?;
        debug!(%request, status, "arr response");
        Ok(Self {
            request,
            status,
            body,
        })
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_rejected(self) -> ArrError {
        ArrError::Rejected {
            request: self.request,
            status: self.status,
            body: self.body,
        }
    }

    /// Decodes a successful response, anything else becomes `Rejected`.
    fn json<R: DeserializeOwned>(self) -> Result<R, ArrError> {
        if !self.is_success() {
            return Err(self.into_rejected());
        }
        serde_json::from_str(&self.body).map_err(|source| ArrError::Decode {
            request: self.request,
            body: self.body,
            source,
        })
    }
}

/// Sorts a failed create into "already there" or a hard rejection.
fn classify_rejection(exchange: Exchange, already_added: &str) -> Result<AddResponse, ArrError> {
    let failures = match serde_json::from_str::<ErrorBody>(&exchange.body) {
        Ok(body) => body.into_failures(),
        Err(_) => return Err(exchange.into_rejected()),
    };

    if failures.iter().any(|f| f.error_message == already_added) {
        Ok(AddResponse::AlreadyAdded)
    } else {
        Err(exchange.into_rejected())
    }
}

impl<T: LibraryItem> LibraryApi for ArrClient<T> {
    type Item = T;

    fn tags(&self) -> Result<Vec<Tag>, ArrError> {
        self.send_get_request("tag", &[])?.json()
    }

    fn create_tag(&self, label: &str) -> Result<Tag, ArrError> {
        self.send_post_request("tag", &json!({ "label": label }))?
            .json()
    }

    fn add(&self, item: &T) -> Result<AddResponse, ArrError> {
        let exchange = self.send_post_request(T::RESOURCE, item)?;
        if exchange.is_success() {
            return Ok(AddResponse::Created);
        }
        classify_rejection(exchange, T::ALREADY_ADDED)
    }

    fn find(&self, target_id: i64) -> Result<Vec<T>, ArrError> {
        self.send_get_request(T::RESOURCE, &[(T::ID_FIELD, target_id.to_string())])?
            .json()
    }

    fn update(&self, id: i64, item: &T) -> Result<(), ArrError> {
        let exchange = self.send_put_request(&format!("{}/{}", T::RESOURCE, id), item)?;
        if exchange.is_success() {
            Ok(())
        } else {
            Err(exchange.into_rejected())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(body: &str) -> Exchange {
        Exchange {
            request: "POST http://localhost:8989/api/v3/series".into(),
            status: 400,
            body: body.into(),
        }
    }

    const ALREADY_ADDED: &str = "This series has already been added";

    #[test]
    fn test_duplicate_in_error_list() {
        let body = r#"[{"propertyName":"TvdbId","errorMessage":"This series has already been added","attemptedValue":9001,"severity":"error","errorCode":"SeriesExistsValidator"}]"#;
        let resp = classify_rejection(rejected(body), ALREADY_ADDED).unwrap();
        assert_eq!(resp, AddResponse::AlreadyAdded);
    }

    #[test]
    fn test_duplicate_as_single_error() {
        let body = r#"{"propertyName":"TvdbId","errorMessage":"This series has already been added"}"#;
        let resp = classify_rejection(rejected(body), ALREADY_ADDED).unwrap();
        assert_eq!(resp, AddResponse::AlreadyAdded);
    }

    #[test]
    fn test_other_validation_error_is_rejected() {
        let body = r#"[{"propertyName":"RootFolderPath","errorMessage":"Folder does not exist"}]"#;
        let err = classify_rejection(rejected(body), ALREADY_ADDED).unwrap_err();
        match err {
            ArrError::Rejected { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("Folder does not exist"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_error_keeps_raw_body() {
        let err = classify_rejection(rejected("<html>Bad Gateway</html>"), ALREADY_ADDED).unwrap_err();
        assert!(matches!(err, ArrError::Rejected { ref body, .. } if body == "<html>Bad Gateway</html>"));
    }

    #[test]
    fn test_json_decode_failure_is_reported() {
        let exchange = Exchange {
            request: "GET http://localhost:8989/api/v3/tag".into(),
            status: 200,
            body: "not json".into(),
        };
        let err = exchange.json::<Vec<Tag>>().unwrap_err();
        assert!(matches!(err, ArrError::Decode { .. }));
    }
}
