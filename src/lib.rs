//! Rule-based pull request labeler.
//!
//! Re-exports the rule engine from `labelcrab-core`; the `labelcrab` binary
//! lives in `labelcrab-cli`.

pub use labelcrab_core::*;
