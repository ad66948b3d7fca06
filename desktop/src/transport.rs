//! ureq-backed transports for the two client paths.
//!
//! # Design
//! Both transports return non-2xx responses as data and map only failures
//! to obtain a response to `UploadError::Transport`. The pinned transport
//! derives its TLS configuration from `PinningOptions`:
//! - `disable_all_security` turns certificate verification off;
//! - otherwise a non-empty `certs` list (DER files) replaces the platform
//!   roots;
//! - public-key pinning has no ureq equivalent, so a pinned transport that
//!   asks for it with security enabled rejects every request.

use std::sync::Arc;

use tracing::{debug, warn};
use upload_core::{HttpMethod, HttpRequest, HttpResponse, PinningOptions, Transport, UploadError};
use ureq::tls::{Certificate, RootCerts, TlsConfig};
use ureq::Agent;

fn agent_with(tls: TlsConfig) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .tls_config(tls)
        .build()
        .new_agent()
}

fn execute_with(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, UploadError> {
    debug!(method = request.method.as_str(), url = %request.path, "executing request");
    let body = request.body.unwrap_or_default();
    let result = match request.method {
        HttpMethod::Put => {
            let mut builder = agent.put(&request.path);
            for (k, v) in &request.headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            builder.send(&body[..])
        }
    };

    let mut response = result.map_err(|e| UploadError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| UploadError::Transport(e.to_string()))?;
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// The plain HTTP client: platform roots, full verification.
pub struct PlainTransport {
    agent: Agent,
}

impl PlainTransport {
    pub fn new() -> Self {
        Self {
            agent: agent_with(TlsConfig::default()),
        }
    }
}

impl Default for PlainTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for PlainTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, UploadError> {
        execute_with(&self.agent, request)
    }
}

/// The pinned HTTP client.
pub struct PinnedTransport {
    agent: Agent,
    rejection: Option<String>,
}

impl PinnedTransport {
    /// Build from pinning options. Fails when a certificate file cannot be
    /// read.
    pub fn new(options: &PinningOptions) -> Result<Self, UploadError> {
        let tls = if options.disable_all_security {
            warn!("pinned client running with all security disabled");
            TlsConfig::builder().disable_verification(true).build()
        } else if options.certs.is_empty() {
            TlsConfig::default()
        } else {
            TlsConfig::builder()
                .root_certs(RootCerts::Specific(Arc::new(load_certs(&options.certs)?)))
                .build()
        };

        let rejection = (!options.disable_all_security && options.pk_pinning)
            .then(|| "public-key pinning is not available in this client".to_string());

        Ok(Self {
            agent: agent_with(tls),
            rejection,
        })
    }
}

fn load_certs(paths: &[String]) -> Result<Vec<Certificate<'static>>, UploadError> {
    paths
        .iter()
        .map(|path| {
            let der = std::fs::read(path).map_err(|e| {
                UploadError::UnsupportedPinning(format!("cannot read certificate {path}: {e}"))
            })?;
            debug!(%path, bytes = der.len(), "loaded pinned certificate");
            Ok(Certificate::from_der(&der).to_owned())
        })
        .collect()
}

impl Transport for PinnedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, UploadError> {
        if let Some(reason) = &self.rejection {
            return Err(UploadError::UnsupportedPinning(reason.clone()));
        }
        execute_with(&self.agent, request)
    }
}
