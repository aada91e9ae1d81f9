//! Named limits imposed by the remote document store
//!
//! All of these are compiled defaults; each one can be overridden through
//! the `[migration]` section of the TOML config.

/// Maximum number of documents returned by one listing page.
///
/// Appwrite caps `limit()` at 100 documents per request on the plans the
/// dashboard runs on.
pub const PAGE_SIZE: u32 = 100;

/// Number of concurrent delete calls issued per purge window.
///
/// Matches the listing page size so one page is deleted per window without
/// tripping the store's rate limiter.
pub const PURGE_CONCURRENCY: usize = 100;

/// Number of concurrent create calls issued during import and replay.
///
/// 1 keeps rows strictly in source order.
pub const IMPORT_CONCURRENCY: usize = 1;

/// Size of the `ethnicGroup` attribute on the participants collection.
///
/// Longer values are rejected by the store, so the normalizer truncates to it.
pub const ETHNIC_GROUP_MAX_LEN: usize = 500;

/// Size used for short identifier and name attributes.
pub const SHORT_TEXT_LEN: u32 = 255;

/// Size used for the free-form address attribute.
pub const ADDRESS_LEN: u32 = 1000;

/// Request timeout applied to every remote call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
