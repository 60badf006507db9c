//! HTTP server configuration object.

use user_registry::inbound::http::state::HttpState;

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Serve `http_state` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: (String, u16), http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state,
        }
    }
}
