//! C6: bit-level Huffman coding of DC differences and AC run-length symbols.
//!
//! Every coded value is `Huffman(symbol) ++ amplitude`, where `amplitude` is
//! the category index written MSB-first in exactly `size` bits (zero bits
//! for `size == 0`, i.e. [`EOB`] and [`ZRL`]).

use bitvec::prelude::*;

use crate::block::LayerType;
use crate::category::{classify, dequantize};
use crate::error::{CoreError, Result};
use crate::huffman_tables::{ac_table, dc_table, AcKey, Bits, AC_EOB, AC_ZRL};
use crate::run_length::{AcSymbol, EOB, ZRL};

/// Largest DC category size the DC tables cover.
const DC_MAX_SIZE: u8 = 11;
/// Largest AC category size the AC tables cover.
const AC_MAX_SIZE: u8 = 10;

fn push_amplitude(bits: &mut Bits, size: u8, index: u16) {
    for shift in (0..size).rev() {
        bits.push((index >> shift) & 1 == 1);
    }
}

fn read_amplitude(bits: &BitSlice<u8, Msb0>, size: u8) -> Result<(u16, usize)> {
    let size = size as usize;
    if bits.len() < size {
        return Err(CoreError::TruncatedBits { expected: size, available: bits.len() });
    }
    let mut index: u16 = 0;
    for bit in &bits[..size] {
        index = (index << 1) | u16::from(*bit);
    }
    Ok((index, size))
}

/// Encode a DC difference as `Huffman(size) ++ amplitude(size bits)`.
pub fn encode_dc(diff: i32, layer: LayerType) -> Result<Bits> {
    let (size, index) = classify(diff)?;
    if size > DC_MAX_SIZE {
        return Err(CoreError::Overflow { value: diff, limit: (1 << DC_MAX_SIZE) - 1 });
    }
    let mut out = dc_table(layer)
        .encode(&size)
        .expect("every size 0..=11 has a DC codeword")
        .clone();
    push_amplitude(&mut out, size, index);
    Ok(out)
}

/// Decode one DC difference, returning its value and the number of bits consumed.
pub fn decode_dc(bits: &BitSlice<u8, Msb0>, layer: LayerType) -> Result<(i32, usize)> {
    let (size, code_len) = dc_table(layer)
        .decode(bits)
        .ok_or(CoreError::NoPrefix { remaining_bits: bits.len() })?;
    let (index, amp_len) = read_amplitude(&bits[code_len..], size)?;
    Ok((dequantize(size, index), code_len + amp_len))
}

/// Encode one AC run-length symbol as `Huffman((run, size)) ++ amplitude`.
/// [`EOB`] and [`ZRL`] encode with no amplitude suffix, since their category
/// size is always zero.
pub fn encode_ac_symbol(symbol: AcSymbol, layer: LayerType) -> Result<Bits> {
    let (key, size, index): (AcKey, u8, u16) = if symbol == EOB {
        (AC_EOB, 0, 0)
    } else if symbol == ZRL {
        (AC_ZRL, 0, 0)
    } else {
        let (run, value) = symbol;
        let (size, index) = classify(value)?;
        if size > AC_MAX_SIZE {
            return Err(CoreError::Overflow { value, limit: (1 << AC_MAX_SIZE) - 1 });
        }
        ((run, size), size, index)
    };

    let mut out = ac_table(layer)
        .encode(&key)
        .ok_or(CoreError::ShapeMismatch { reason: "no AC codeword for this (run, size) pair" })?
        .clone();
    push_amplitude(&mut out, size, index);
    Ok(out)
}

/// Decode one AC run-length symbol, returning the symbol and bits consumed.
pub fn decode_ac_symbol(bits: &BitSlice<u8, Msb0>, layer: LayerType) -> Result<(AcSymbol, usize)> {
    let ((run, size), code_len) = ac_table(layer)
        .decode(bits)
        .ok_or(CoreError::NoPrefix { remaining_bits: bits.len() })?;
    if size == 0 {
        return Ok(((run, 0), code_len));
    }
    let (index, amp_len) = read_amplitude(&bits[code_len..], size)?;
    Ok(((run, dequantize(size, index)), code_len + amp_len))
}
