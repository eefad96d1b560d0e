//! Image source resolution.
//!
//! Normalizes a user-supplied file or a bundled default asset into a decoded,
//! immutable [`ImageHandle`]. A failed decode never touches editor state; the
//! caller keeps its previous handle.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::source::{resolve, ImageSource};
//!
//! let bytes = std::fs::read("avatar.jpg").unwrap();
//! let image = resolve(ImageSource::File(&bytes)).unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod decode;
mod types;

pub use decode::{decode_image, get_orientation, resolve, Orientation};
pub use types::{DecodeError, ImageHandle, ImageSource};
