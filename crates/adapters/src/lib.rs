//! pagewatch adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain
//! ports:
//! - `http`: reqwest-based page fetcher
//! - `markup`: scraper-based markup parser
//! - `sniff`: infer-based binary/media type sniffer
//! - `render`: html2text renderer for rendered-text mode
//! - `registry_fs` / `registry_memory`: cache stores

mod http;
mod markup;
mod registry_fs;
mod registry_memory;
mod render;
mod sniff;

pub use http::ReqwestFetcher;
pub use markup::ScraperParser;
pub use render::Html2textRenderer;
pub use sniff::InferSniffer;

/// Re-exports for registry/snapshot stores
pub mod registry {
    pub use crate::registry_fs::FsRegistryStore;
    pub use crate::registry_memory::InMemoryRegistryStore;
}
