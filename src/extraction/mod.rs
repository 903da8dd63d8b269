//! Article extraction module
//!
//! This module turns a parsed page into article records: selector
//! configuration, the document wrapper, link resolution and the tiered
//! extraction engine.

pub mod article;
pub mod document;
pub mod engine;
pub mod links;
pub mod selectors;

pub use article::{ArticleRecord, ExtractionOutcome, Tier, UNKNOWN_AUTHOR};
pub use document::Document;
pub use engine::{ArticleExtractor, ContainerLock, ExtractionOptions};
pub use links::{resolve_link, LinkType};
pub use selectors::{SelectorConfig, SelectorSet};
