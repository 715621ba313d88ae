//! Image handling for logged actions.
//!
//! - **Compression**: uploaded files are downscaled to a maximum width and
//!   re-encoded as JPEG, then embedded into the record as a `data:` URI.
//!
//! - **URL normalization**: gallery links of known image hosts are rewritten
//!   to their direct-image form.
//!
//! - **Probing**: a best-effort check that a URL serves something an image
//!   decoder accepts, with extension fallbacks.
//!
//! # Example
//!
//! ```
//! use herolog::images::normalize_url;
//!
//! assert_eq!(
//!     normalize_url("https://imgur.com/abc123"),
//!     "https://i.imgur.com/abc123.png"
//! );
//! ```

mod compress;
mod probe;
mod url;

pub use compress::{compress, compress_file, scaled_dimensions, CompressOptions};
pub use probe::{probe, HttpImageLoader, ImageLoader, ProbeResult};
pub use url::{normalize_url, DEFAULT_EXTENSION};
