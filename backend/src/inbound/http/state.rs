//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they stay testable without a database or Redis.

use std::sync::Arc;

use crate::domain::ports::{UserListing, UserStore};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Active storage adapter.
    pub users: Arc<dyn UserStore>,
    /// Listing capability, present only when the backend supports it.
    pub listing: Option<Arc<dyn UserListing>>,
}

impl HttpState {
    /// State backed by a store without the listing capability.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            listing: None,
        }
    }

    /// Attach the listing capability.
    #[must_use]
    pub fn with_listing(mut self, listing: Arc<dyn UserListing>) -> Self {
        self.listing = Some(listing);
        self
    }
}
