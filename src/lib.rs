//! Baseline JPEG entropy coding core.
//!
//! This crate implements the lossless back half of a baseline JPEG-style
//! codec: zig-zag traversal of 8x8 coefficient blocks, DPCM coding of DC
//! coefficients, run-length coding of AC coefficients with the ZRL/EOB
//! boundary tokens, and canonical Huffman coding of both against four fixed
//! tables (DC/AC x luminance/chrominance).
//!
//! Color conversion, subsampling, the DCT/quantization stages, container
//! framing and file I/O are out of scope; [`codec::Encoder`] and
//! [`codec::Decoder`] speak only in terms of [`block::Block`] sequences and
//! the four-bitstring [`codec::CompressedArtifact`].

pub mod block;
pub mod category;
pub mod codec;
pub mod differential;
pub mod error;
pub mod huffman_codec;
pub mod huffman_tables;
pub mod run_length;
pub mod zigzag;

pub use block::{Block, LayerType, BLOCK_SIZE};
pub use category::{classify, dequantize};
pub use codec::{CompressedArtifact, Decoder, Encoder};
pub use error::{CoreError, Result};
pub use run_length::{AcSymbol, AC_LENGTH, EOB, ZRL};
pub use zigzag::{inverse_iter_zig_zag, iter_zig_zag};
