//! Configuration parsing for the manifest and the flags file

pub mod flags;
pub mod manifest;

pub use flags::{generate_flags_script, parse_flags, render_flags, FlagValue, FlagsFile};
pub use manifest::{expand_tilde, parse_manifest, CloneProtocol, Manifest, RepoConfig};
