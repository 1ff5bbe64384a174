/// Re-export `Config` from `visitlogger-core` for use within this crate.
///
/// All environment-variable parsing lives in `visitlogger-core` so it can be
/// shared with integration tests and the store backend without depending on
/// the full server.
pub use visitlogger_core::config::Config;
