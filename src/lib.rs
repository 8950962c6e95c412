//! # qrmcu
//!
//! A minimal QR code encoder for microcontrollers.
//!
//! `qrmcu` turns a short byte buffer into a QR Code Model 2 symbol of version
//! 1, 2 or 3 (21, 25 or 29 modules wide) at error correction level L, using
//! byte mode only. It never allocates: the whole symbol is kept as one `u32`
//! per row and every working buffer is a fixed-size array.
//!
//! ## Features
//!
//! - `no_std`, no heap, no unsafe code.
//! - Capacity: 17, 32 and 53 bytes for versions 1, 2 and 3.
//! - Automatic mask selection with the four standard penalty rules, or a
//!   forced mask.
//! - Three speed tiers trading code size for encoding time, all producing
//!   bit-identical symbols.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrmcu = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Encode a URL and walk the modules, for example to drive a display:
//!
//! ```rust
//! use qrmcu::{QrContext, Speed};
//!
//! let data = b"https://example.com";
//! let mut ctx = QrContext::new(Speed::Fast);
//! if ctx.evaluate(2, data) {
//!     ctx.encode();
//!     for y in 0..ctx.size() {
//!         for x in 0..ctx.size() {
//!             let _dark: bool = ctx.get_module(x, y);
//!         }
//!     }
//! }
//! ```
//!
//! Find out why an input was rejected:
//!
//! ```rust
//! use qrmcu::{EvalError, QrContext};
//!
//! let mut ctx = QrContext::default();
//! let err = ctx.try_evaluate(1, &[0u8; 18]).unwrap_err();
//! assert_eq!(err, EvalError::DataOverCapacity { len: 18, capacity: 17 });
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Evaluation, module placement and the encoding pipeline.
//! - [`codewords`]: Data codeword assembly.
//! - [`ecc`]: Reed-Solomon error correction.
//! - [`mask`]: Mask patterns and penalty scoring.
//! - [`bitmap`]: The packed symbol grid.
//! - [`config`]: Speed tiers.
#![no_std]
#![forbid(unsafe_code)]

pub mod bitmap;
pub mod codewords;
pub mod config;
pub mod ecc;
pub mod error;
pub mod mask;
pub mod qrcode;

pub use bitmap::{Bitmap, QR_LINES};
pub use config::Speed;
pub use error::EvalError;
pub use mask::Mask;
pub use qrcode::{Layout, QrContext, Version};
