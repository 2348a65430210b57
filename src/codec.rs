//! C7: Encoder/Decoder orchestrators composing C3-C6.
//!
//! `Encoder` forms the two layer sequences (luminance, and chrominance as
//! `concat(cb, cr)`), resolves DPCM and run-length sequences eagerly in
//! `new`, and only Huffman-encodes them (the fallible step) in `encode`.
//! `Decoder` mirrors this in reverse inside `decode`.

use crate::block::{Block, LayerType, BLOCK_SIZE};
use crate::differential::{decode_differential, encode_differential};
use crate::error::{CoreError, Result};
use crate::huffman_codec::{decode_ac_symbol, decode_dc, encode_ac_symbol, encode_dc};
use crate::huffman_tables::Bits;
use crate::run_length::{decode_run_length, encode_run_length, AcSymbol, EOB};
use crate::zigzag::{inverse_iter_zig_zag, iter_zig_zag};

use bitvec::prelude::*;

#[derive(Debug, Clone, Default)]
struct LayerPair<T> {
    luma: T,
    chroma: T,
}

impl<T> LayerPair<T> {
    fn get(&self, layer: LayerType) -> &T {
        match layer {
            LayerType::Luminance => &self.luma,
            LayerType::Chrominance => &self.chroma,
        }
    }
}

/// The four independent bitstrings an encode call produces, and the only
/// thing that crosses the boundary to a framing layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressedArtifact {
    /// Huffman-coded DC differences for the luminance layer.
    pub dc_luma: Bits,
    /// Huffman-coded DC differences for the chrominance layer (Cb then Cr).
    pub dc_chroma: Bits,
    /// Huffman-coded AC run-length symbols for the luminance layer.
    pub ac_luma: Bits,
    /// Huffman-coded AC run-length symbols for the chrominance layer.
    pub ac_chroma: Bits,
}

fn dc_column(blocks: &[Block]) -> Vec<i32> {
    blocks.iter().map(Block::dc).collect()
}

fn ac_symbols_of(block: &Block) -> Vec<AcSymbol> {
    let zigzag = iter_zig_zag(&block.rows()).expect("blocks are always 8x8, hence square");
    encode_run_length(&zigzag[1..])
}

fn encode_dc_stream(diffs: &[i32], layer: LayerType) -> Result<Bits> {
    let mut out = Bits::new();
    for &d in diffs {
        out.extend_from_bitslice(&encode_dc(d, layer)?);
    }
    Ok(out)
}

fn encode_ac_stream(groups: &[Vec<AcSymbol>], layer: LayerType) -> Result<Bits> {
    let mut out = Bits::new();
    for symbols in groups {
        for &symbol in symbols {
            out.extend_from_bitslice(&encode_ac_symbol(symbol, layer)?);
        }
    }
    Ok(out)
}

fn decode_dc_stream(bits: &BitSlice<u8, Msb0>, layer: LayerType) -> Result<Vec<i32>> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while cursor < bits.len() {
        let (value, consumed) = decode_dc(&bits[cursor..], layer)?;
        out.push(value);
        cursor += consumed;
    }
    Ok(out)
}

fn decode_ac_stream(bits: &BitSlice<u8, Msb0>, layer: LayerType) -> Result<Vec<Vec<AcSymbol>>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut cursor = 0;
    while cursor < bits.len() {
        let (symbol, consumed) = decode_ac_symbol(&bits[cursor..], layer)?;
        cursor += consumed;
        current.push(symbol);
        if symbol == EOB {
            groups.push(std::mem::take(&mut current));
        }
    }
    Ok(groups)
}

fn rebuild_blocks(dc: &[i32], ac_groups: &[Vec<AcSymbol>]) -> Vec<Block> {
    dc.iter()
        .zip(ac_groups)
        .map(|(&dc_value, symbols)| {
            let ac = decode_run_length(symbols);
            let mut coefficients = Vec::with_capacity(1 + ac.len());
            coefficients.push(dc_value);
            coefficients.extend(ac);
            let rows = inverse_iter_zig_zag(&coefficients, Some(BLOCK_SIZE), 0);
            Block::from_rows(rows)
        })
        .collect()
}

/// Composes C3-C6 over a luminance plane and a chrominance plane pair.
///
/// Construction resolves the DPCM and run-length sequences eagerly (neither
/// can fail); [`Encoder::encode`] performs the Huffman coding step, which can
/// fail on out-of-range amplitudes.
pub struct Encoder {
    diff_dc: LayerPair<Vec<i32>>,
    run_length_ac: LayerPair<Vec<Vec<AcSymbol>>>,
}

impl Encoder {
    /// Build an encoder over one luminance plane and two chrominance planes.
    /// Chrominance is coded as `concat(cb, cr)` under the chrominance tables.
    pub fn new(y: &[Block], cb: &[Block], cr: &[Block]) -> Self {
        let chroma: Vec<Block> = cb.iter().chain(cr.iter()).copied().collect();

        let diff_dc = LayerPair {
            luma: encode_differential(&dc_column(y)),
            chroma: encode_differential(&dc_column(&chroma)),
        };
        let run_length_ac = LayerPair {
            luma: y.iter().map(ac_symbols_of).collect(),
            chroma: chroma.iter().map(ac_symbols_of).collect(),
        };
        Encoder { diff_dc, run_length_ac }
    }

    /// The DPCM-encoded DC differences for a layer, in block order.
    pub fn diff_dc(&self, layer: LayerType) -> &[i32] {
        self.diff_dc.get(layer)
    }

    /// The per-block AC run-length symbol lists for a layer, in block order.
    pub fn run_length_ac(&self, layer: LayerType) -> &[Vec<AcSymbol>] {
        self.run_length_ac.get(layer)
    }

    /// Huffman-encode the cached DPCM/run-length sequences into the four
    /// output bitstrings.
    pub fn encode(&self) -> Result<CompressedArtifact> {
        Ok(CompressedArtifact {
            dc_luma: encode_dc_stream(&self.diff_dc.luma, LayerType::Luminance)?,
            dc_chroma: encode_dc_stream(&self.diff_dc.chroma, LayerType::Chrominance)?,
            ac_luma: encode_ac_stream(&self.run_length_ac.luma, LayerType::Luminance)?,
            ac_chroma: encode_ac_stream(&self.run_length_ac.chroma, LayerType::Chrominance)?,
        })
    }
}

/// Inverse of [`Encoder`]: Huffman-decodes a [`CompressedArtifact`] back
/// into luminance and chrominance (split into Cb/Cr) block sequences.
pub struct Decoder {
    diff_dc: LayerPair<Vec<i32>>,
    run_length_ac: LayerPair<Vec<Vec<AcSymbol>>>,
    y: Vec<Block>,
    cb: Vec<Block>,
    cr: Vec<Block>,
}

impl Decoder {
    /// Decode a [`CompressedArtifact`], checking the shape invariants from
    /// §4.7 before reconstructing blocks.
    pub fn decode(artifact: &CompressedArtifact) -> Result<Self> {
        let diff_dc = LayerPair {
            luma: decode_dc_stream(&artifact.dc_luma, LayerType::Luminance)?,
            chroma: decode_dc_stream(&artifact.dc_chroma, LayerType::Chrominance)?,
        };
        let run_length_ac = LayerPair {
            luma: decode_ac_stream(&artifact.ac_luma, LayerType::Luminance)?,
            chroma: decode_ac_stream(&artifact.ac_chroma, LayerType::Chrominance)?,
        };

        if diff_dc.luma.len() != run_length_ac.luma.len() {
            return Err(CoreError::ShapeMismatch {
                reason: "luminance DC and AC block counts disagree",
            });
        }
        if diff_dc.chroma.len() != run_length_ac.chroma.len() {
            return Err(CoreError::ShapeMismatch {
                reason: "chrominance DC and AC block counts disagree",
            });
        }
        if diff_dc.chroma.len() % 2 != 0 {
            return Err(CoreError::ShapeMismatch {
                reason: "chrominance block count is not even",
            });
        }

        let y = rebuild_blocks(&decode_differential(&diff_dc.luma), &run_length_ac.luma);
        let chroma_blocks =
            rebuild_blocks(&decode_differential(&diff_dc.chroma), &run_length_ac.chroma);
        let half = chroma_blocks.len() / 2;
        let (cb, cr) = chroma_blocks.split_at(half);

        Ok(Decoder { diff_dc, run_length_ac, y, cb: cb.to_vec(), cr: cr.to_vec() })
    }

    /// The Huffman-decoded DC differences for a layer, before inverse DPCM.
    pub fn diff_dc(&self, layer: LayerType) -> &[i32] {
        self.diff_dc.get(layer)
    }

    /// The per-block AC run-length symbol lists decoded for a layer.
    pub fn run_length_ac(&self, layer: LayerType) -> &[Vec<AcSymbol>] {
        self.run_length_ac.get(layer)
    }

    /// The reconstructed luminance blocks.
    pub fn y(&self) -> &[Block] {
        &self.y
    }

    /// The reconstructed Cb blocks.
    pub fn cb(&self) -> &[Block] {
        &self.cb
    }

    /// The reconstructed Cr blocks.
    pub fn cr(&self) -> &[Block] {
        &self.cr
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bits_of(s: &str) -> Bits {
        s.chars().map(|c| c == '1').collect()
    }

    fn block_with_dc(dc: i32) -> Block {
        let mut b = Block::zeroed();
        b.0[0][0] = dc;
        b
    }

    #[test]
    fn s1_dc_only_block() {
        let block = block_with_dc(5);
        let enc = Encoder::new(&[block], &[], &[]);
        assert_eq!(enc.diff_dc(LayerType::Luminance), &[5]);

        let artifact = enc.encode().unwrap();
        assert_eq!(artifact.dc_luma, bits_of("100101"));
        assert_eq!(artifact.ac_luma, bits_of("1010"));
    }

    #[test]
    fn s2_single_nonzero_ac_at_position_one() {
        let mut coefficients = vec![0i32; 64];
        coefficients[1] = 1;
        let rows = inverse_iter_zig_zag(&coefficients, Some(BLOCK_SIZE), 0);
        let block = Block::from_rows(rows);

        let enc = Encoder::new(&[block], &[], &[]);
        let artifact = enc.encode().unwrap();
        assert_eq!(artifact.dc_luma, bits_of("00"));
        assert_eq!(artifact.ac_luma, bits_of("0011010"));
    }

    #[test]
    fn s3_zrl_scenario() {
        let mut coefficients = vec![0i32; 64];
        coefficients[17] = 2;
        let rows = inverse_iter_zig_zag(&coefficients, Some(BLOCK_SIZE), 0);
        let block = Block::from_rows(rows);

        let enc = Encoder::new(&[block], &[], &[]);
        let artifact = enc.encode().unwrap();
        assert_eq!(artifact.dc_luma, bits_of("00"));
        assert_eq!(artifact.ac_luma, bits_of("1111111100101101010"));
    }

    #[test]
    fn s4_chrominance_concatenates_cb_then_cr_and_splits_back_evenly() {
        let cb_block = block_with_dc(10);
        let cr_block = block_with_dc(7);

        let enc = Encoder::new(&[], &[cb_block], &[cr_block]);
        assert_eq!(enc.diff_dc(LayerType::Chrominance), &[10, -3]);

        let artifact = enc.encode().unwrap();
        let dec = Decoder::decode(&artifact).unwrap();
        assert_eq!(dec.cb().to_vec(), vec![cb_block]);
        assert_eq!(dec.cr().to_vec(), vec![cr_block]);
    }

    #[test]
    fn p1_full_round_trip_over_a_mixed_image() {
        let mut sparse = Block::zeroed();
        sparse.0[0][0] = -42;
        sparse.0[3][5] = 7;
        sparse.0[7][7] = -1;

        let y = vec![Block::zeroed(), block_with_dc(100), sparse];
        let cb = vec![block_with_dc(-30), Block::zeroed()];
        let cr = vec![block_with_dc(15), sparse];

        let enc = Encoder::new(&y, &cb, &cr);
        let artifact = enc.encode().unwrap();
        let dec = Decoder::decode(&artifact).unwrap();

        assert_eq!(dec.y().to_vec(), y);
        assert_eq!(dec.cb().to_vec(), cb);
        assert_eq!(dec.cr().to_vec(), cr);
    }

    #[test]
    fn q1_distinct_inputs_produce_distinct_bitstreams() {
        let a = Encoder::new(&[block_with_dc(5)], &[], &[]).encode().unwrap();
        let b = Encoder::new(&[block_with_dc(6)], &[], &[]).encode().unwrap();
        assert_ne!(a.dc_luma, b.dc_luma);
    }

    #[test]
    fn shape_mismatch_when_chrominance_block_count_is_odd() {
        let artifact = Encoder::new(&[], &[block_with_dc(1)], &[]).encode().unwrap();
        assert_eq!(
            Decoder::decode(&artifact),
            Err(CoreError::ShapeMismatch { reason: "chrominance block count is not even" })
        );
    }
}
