//! # INI codec
//!
//! Converts between INI text and a [`Store`](crate::store::Store).
//!
//! ```text
//! name=value
//! list[]=one
//! list[]=two
//!
//! [server tls]
//! cert = "/etc/ssl/cert.pem"
//! ```
//!
//! Section headers containing spaces nest (`[server tls]` is the store
//! `server` -> `tls`). Values `null`, `true` and `false` are typed, every
//! other bare value is a string. Tokens that would be ambiguous in bare
//! form are written as JSON string literals.

pub mod decode;
pub mod encode;
pub mod escape;
pub mod options;

pub use decode::{decode, decode_into};
pub use encode::encode;
pub use escape::{escape, unescape, Unescaped};
pub use options::{DecodeOptions, EncodeOptions};
