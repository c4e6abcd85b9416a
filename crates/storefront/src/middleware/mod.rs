//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layer (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, no-store)
//! 5. Session lock (one request at a time per session cookie)
//! 6. Session layer (tower-sessions with a bounded in-memory store)

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_lock;
pub mod session_store;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use session_lock::{SessionLocks, session_lock_middleware};
pub use session_store::MokaSessionStore;
