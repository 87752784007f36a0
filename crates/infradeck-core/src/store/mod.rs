// ── Response store ──
//
// `ResponseCache` holds raw list responses; `CachedLoader` is the
// cache-or-fetch front door the tabs read through.

mod cache;
mod loader;

pub use cache::{CacheKey, ResponseCache};
pub use loader::CachedLoader;
