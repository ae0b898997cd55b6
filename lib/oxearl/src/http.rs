use oxhttp::model::header::{ACCEPT, CONTENT_TYPE};
use oxhttp::model::{Body, Request};
use std::io::{Error, ErrorKind, Result};
use std::sync::Arc;
use std::time::Duration;

/// Media types of the processor descriptions we know how to read, by order of preference.
const DESCRIPTION_ACCEPT: &str = "text/turtle, application/n-triples;q=0.9, application/ld+json;q=0.8, application/rdf+xml;q=0.8, text/html;q=0.5, application/xhtml+xml;q=0.5";

/// HTTP client retrieving the processor descriptions.
#[derive(Clone)]
pub struct Client {
    client: Arc<oxhttp::Client>,
}

impl Client {
    pub fn new(timeout: Duration, redirection_limit: usize) -> Result<Self> {
        let client = oxhttp::Client::new()
            .with_redirection_limit(redirection_limit)
            .with_user_agent(concat!("OxEARL/", env!("CARGO_PKG_VERSION")))
            .map_err(invalid_input_error)?
            .with_global_timeout(timeout);
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Retrieves a processor description, returning its content type if known.
    pub fn get_description(&self, url: &str) -> Result<(Option<String>, Body)> {
        let request = Request::builder()
            .uri(url)
            .header(ACCEPT, DESCRIPTION_ACCEPT)
            .body(())
            .map_err(invalid_input_error)?;
        let response = self.client.request(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::other(format!(
                "The processor description server {url} returned {status}"
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| value.to_str().map(str::to_owned))
            .transpose()
            .map_err(invalid_data_error)?;
        Ok((content_type, response.into_body()))
    }
}

fn invalid_data_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidData, error)
}

fn invalid_input_error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::new(ErrorKind::InvalidInput, error)
}
