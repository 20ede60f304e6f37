//! Authentication gate backed by the service credential.
//!
//! The server has no browser to run an interactive consent flow, so "offering
//! sign-in" means attempting to obtain a token from the configured source.

use std::sync::Arc;

use async_trait::async_trait;
use sitecal_core::CalendarAuthGate;
use sitecal_domain::Result;
use tracing::{info, warn};

use super::token::AccessTokenSource;

pub struct ServiceCredentialGate {
    tokens: Arc<dyn AccessTokenSource>,
}

impl ServiceCredentialGate {
    pub fn new(tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl CalendarAuthGate for ServiceCredentialGate {
    async fn is_authenticated(&self) -> bool {
        self.tokens.has_credentials()
    }

    async fn request_authentication(&self) -> Result<bool> {
        if !self.tokens.has_credentials() {
            warn!("No Google credentials configured; calendar sign-in unavailable");
            return Ok(false);
        }
        self.tokens.access_token().await?;
        info!("Obtained Google access token");
        Ok(true)
    }
}
