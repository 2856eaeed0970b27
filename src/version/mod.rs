//! Version layer: comparing versions and fetching the latest published ones
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registries │────▶│   Fetcher   │────▶│   Checker   │
//! │ (github,    │     │ (timeout,   │     │  (status)   │
//! │  manifest)  │     │  dispatch)  │     └─────────────┘
//! └─────────────┘     └─────────────┘            │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │   Semver    │
//!                                         │(version cmp)│
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: Status derivation from an installed/latest pair
//! - [`error`]: Error types for fetch, store and parse operations
//! - [`fetcher`]: Timeout-bounded, never-failing latest version lookup
//! - [`registry`]: Trait for one kind of remote release source
//! - [`registries`]: Concrete sources (GitHub releases, JSON manifests)
//! - [`semver`]: Loose version parsing and ordering
//! - [`types`]: Watched packages, source locators and check results

pub mod checker;
pub mod error;
pub mod fetcher;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
