//! Call resolution: from a call site to the methods it may invoke.
//!
//! Static resolution here is best-effort. Receivers are usually local
//! variables of unknown type, so the resolver tries progressively looser
//! lookups (see `ResolutionTier`) and returns every plausible candidate,
//! capped. The traverser follows all of them.

pub mod cache;
pub mod qualifier;
pub mod resolution;
pub mod types;

pub use cache::ResolverCache;
pub use qualifier::simplify_qualifier;
pub use resolution::{is_noise_call, CallResolver};
pub use types::{CallResolution, ResolutionDiagnostics, ResolutionTier, ResolverPolicy};
