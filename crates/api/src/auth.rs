// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-token attachment.

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use qwikride::SessionStore;
use std::sync::Arc;

/// Header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Supplies the bearer token for outbound requests.
pub trait CredentialSource: Send + Sync {
    /// Returns the current token, or `None` when nobody is signed in.
    fn bearer_token(&self) -> Option<String>;
}

impl CredentialSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        Self::bearer_token(self)
    }
}

/// Transport wrapper that attaches `Authorization: Bearer <token>`.
///
/// The token is read on every request, so a login or logout takes effect
/// on the next call without rebuilding the client.
pub struct BearerAuth<T> {
    inner: T,
    credentials: Arc<dyn CredentialSource>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for BearerAuth<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<T> BearerAuth<T> {
    /// Wraps `inner`, reading tokens from `credentials`.
    #[must_use]
    pub const fn new(inner: T, credentials: Arc<dyn CredentialSource>) -> Self {
        Self { inner, credentials }
    }

    /// Returns the wrapped transport.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for BearerAuth<T> {
    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(token) = self
            .credentials
            .bearer_token()
            .filter(|token| !token.is_empty())
        {
            request.set_header(AUTHORIZATION_HEADER, format!("Bearer {token}"));
        }
        self.inner.send(request).await
    }
}
