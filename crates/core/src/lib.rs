//! Domain logic for the LuckyMart operational scripts.
//!
//! Edge-function deployment and schema migrations both run as a linear batch
//! of external MCP tool calls ([`batch`]); the untranslated-text lint lives in
//! [`i18n_scan`]. Nothing here prints to stdout: the `luckymart-scripts`
//! binaries own all user-facing output.

pub mod batch;
pub mod edge_functions;
pub mod error;
pub mod i18n_scan;
pub mod migration;
pub mod tooling;
