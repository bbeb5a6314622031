//! Request scope - guaranteed context lifecycle
//!
//! A [`RequestScope`] owns the [`RequestContext`] for exactly one request.
//! Dropping the scope expires the context, on success and error paths
//! alike, so an override can never outlive its request. No context is
//! ever reused across requests.

use kirjuri_core::RequestContext;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Owns one request's context from begin to end
pub struct RequestScope {
    ctx: RequestContext,
}

impl RequestScope {
    /// Begin a request scope around a fresh context
    pub(crate) fn new(ctx: RequestContext) -> Self {
        debug!(request_id = %ctx.request_id(), "request scope begins");
        Self { ctx }
    }

    /// The owned context
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// The owned context, mutably
    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.ctx
    }

    /// End the scope explicitly
    ///
    /// Equivalent to dropping the scope; provided for call sites that want
    /// the end of the request to be visible in the code.
    pub fn end(self) {}
}

impl Deref for RequestScope {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for RequestScope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        debug!(request_id = %self.ctx.request_id(), "request scope ends");
        self.ctx.expire();
    }
}
