//! Heuristic runtime type-name resolution
//!
//! Given a value read from the target, [`TypeInfoResolver::resolve`] tries,
//! in order:
//!
//! 1. the value as an object whose first field points at a type-getter stub,
//! 2. the object one pointer hop away (`"Ptr -> "`),
//! 3. the object behind a weak reference cell (`"WeakPtr -> "`),
//! 4. a type descriptor pointer at a fixed offset inside the object, accepted
//!    only inside the configured module window.
//!
//! Every failure along the way just means "this branch yields nothing". The
//! resolver never writes to the target and keeps no state between calls.

mod config;
pub mod name;
mod node_info;
mod pointer_info;
mod stub;

pub use config::ResolverConfig;
pub use node_info::{Resolution, POINTER_PREFIX, WEAK_POINTER_PREFIX};
pub use stub::StubDecoder;

use crate::config::Config;

/// Stateless resolver; share it freely across calls and threads
#[derive(Debug, Clone)]
pub struct TypeInfoResolver {
    config: ResolverConfig,
    decoder: StubDecoder,
}

impl TypeInfoResolver {
    /// Create a resolver; the stub decoder is fixed by the configured width
    pub fn new(config: ResolverConfig) -> Self {
        let decoder = StubDecoder::for_width(config.width);
        TypeInfoResolver { config, decoder }
    }

    /// Build from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(ResolverConfig::from(config))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn decoder(&self) -> StubDecoder {
        self.decoder
    }
}

impl Default for TypeInfoResolver {
    fn default() -> Self {
        TypeInfoResolver::new(ResolverConfig::default())
    }
}
