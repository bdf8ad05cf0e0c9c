//! report-bridge library
//!
//! Glue between the report-server load-test harness and its mapping core:
//!
//! - Converting values between the product API types and the test-harness
//!   mirror types ([`mirror_convert`])
//! - Choosing a render format by name and binding its export options
//!   ([`render_variants`])
//!
//! # CLI Usage
//!
//! ```bash
//! # List every render format and its options
//! report-bridge variants list
//!
//! # Bind overrides and print the resulting parameter map
//! report-bridge variants bind pdf --set StartPage=1 --set EndPage=1
//!
//! # Convert a product value into its test-harness counterpart
//! report-bridge convert --catalog catalog.yaml --input execution_info.json
//! ```

use clap::Args;
use mirror_convert::UnresolvedPolicy;

pub mod config;
pub mod export;
pub mod mapping;

pub use config::BridgeConfig;

/// Universe settings that override the configuration file.
#[derive(Args, Clone, Debug, Default)]
pub struct UniverseOpts {
    /// Namespace prefix of product types
    #[arg(long, env = "REPORT_BRIDGE_PRODUCT_PREFIX")]
    pub product_prefix: Option<String>,

    /// Qualified-name prefix of test-harness types
    #[arg(long, env = "REPORT_BRIDGE_TEST_PREFIX")]
    pub test_prefix: Option<String>,

    /// Namespace of product counterparts of harness types
    #[arg(long, env = "REPORT_BRIDGE_TARGET_NAMESPACE")]
    pub target_namespace: Option<String>,

    /// What to do when a value's type has no counterpart (null or error)
    #[arg(long)]
    pub unresolved: Option<UnresolvedPolicy>,
}
