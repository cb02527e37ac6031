//! Routing transport
//!
//! The HTTP seam used by [`crate::RouteService`]. The default transport runs
//! a blocking `reqwest` client on smol's blocking pool so the cooperative
//! executor never stalls on the network.

use std::future::Future;

use url::Url;

use crate::{RoutingConfig, RoutingError};

/// Raw HTTP response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Check if response is OK (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues routing GET requests
pub trait RouteTransport {
    fn get(&self, url: &Url) -> impl Future<Output = Result<TransportResponse, RoutingError>>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a client honouring the configured timeout and user agent.
    ///
    /// Must be called outside of any async context.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

impl RouteTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, RoutingError> {
        tracing::info!("HTTP GET {}", url);

        let client = self.client.clone();
        let url = url.clone();
        smol::unblock(move || {
            let response = client.get(url).send()?;
            let status = response.status().as_u16();
            let body = response.bytes()?.to_vec();
            Ok(TransportResponse { status, body })
        })
        .await
    }
}
