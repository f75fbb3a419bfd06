//! Reqwest-backed directory source.
//!
//! Owns transport details only: URL construction, status mapping and JSON
//! decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::Official,
    error::DirectoryError,
    protocol::{OfficialListResponse, PartyListResponse},
};
use tracing::debug;
use url::Url;

use crate::{
    config::Settings,
    request::{officials_url, parties_url, DirectoryRequest, QueryDefaults},
    DirectoryPayload, DirectorySource,
};

pub struct HttpDirectorySource {
    http: Client,
    base_url: Url,
    defaults: QueryDefaults,
}

impl HttpDirectorySource {
    pub fn new(base_url: Url, defaults: QueryDefaults) -> Self {
        Self {
            http: Client::new(),
            base_url,
            defaults,
        }
    }

    /// Builds a source whose client honours the configured request timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: settings.api_base_url.clone(),
            defaults: settings.query_defaults(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DirectoryError> {
        debug!(%url, "directory: GET");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| DirectoryError::malformed(format!("invalid JSON payload: {err}")))
    }
}

#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch_officials(
        &self,
        request: &DirectoryRequest,
    ) -> Result<DirectoryPayload, DirectoryError> {
        let url = officials_url(&self.base_url, request, &self.defaults)
            .map_err(|err| DirectoryError::Network(err.to_string()))?;
        let body: OfficialListResponse = self.get_json(url).await?;
        Ok(DirectoryPayload {
            officials: body.dados.into_iter().map(Official::from).collect(),
            links: body.links,
        })
    }

    async fn fetch_party_codes(&self) -> Result<Vec<String>, DirectoryError> {
        let url = parties_url(&self.base_url, &self.defaults)
            .map_err(|err| DirectoryError::Network(err.to_string()))?;
        let body: PartyListResponse = self.get_json(url).await?;
        Ok(body.dados.into_iter().map(|party| party.sigla).collect())
    }
}

fn map_transport_error(err: reqwest::Error) -> DirectoryError {
    if err.is_decode() {
        DirectoryError::malformed(err.to_string())
    } else {
        DirectoryError::Network(err.to_string())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
