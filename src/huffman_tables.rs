//! C2: the four static baseline Huffman tables (DC/AC x luminance/chrominance).
//!
//! Codewords are transcribed verbatim from the reference implementation's
//! `HUFFMAN_CATEGORY_CODEWORD` tables (see `DESIGN.md`), in the same
//! `"<hex symbol>\t<length>\t<bits>"` text-block format the teacher used for
//! its own Huffman tables. Each table builds a forward `symbol -> bits` map
//! for encoding and a binary prefix trie for decoding, both once, at
//! `lazy_static!` initialization time.

use std::collections::HashMap;
use std::hash::Hash;

use bitvec::prelude::*;
use lazy_static::lazy_static;

/// A codeword, stored MSB-first so indexing and `iter()` walk it in
/// transmission order.
pub type Bits = BitVec<u8, Msb0>;

/// `(run, size)` key used by the AC tables. `EOB = (0, 0)`, `ZRL = (15, 0)`.
pub type AcKey = (u8, u8);

/// The AC end-of-block key.
pub const AC_EOB: AcKey = (0, 0);
/// The AC zero-run-length key.
pub const AC_ZRL: AcKey = (15, 0);

struct TrieNode<S> {
    children: [Option<Box<TrieNode<S>>>; 2],
    symbol: Option<S>,
}

impl<S> TrieNode<S> {
    fn new() -> Self {
        TrieNode { children: [None, None], symbol: None }
    }
}

fn trie_insert<S: Copy>(root: &mut TrieNode<S>, bits: &Bits, symbol: S) {
    let mut node = root;
    for bit in bits.iter() {
        let idx = usize::from(*bit);
        node = &mut **node.children[idx].get_or_insert_with(|| Box::new(TrieNode::new()));
    }
    node.symbol = Some(symbol);
}

fn trie_decode<S: Copy>(root: &TrieNode<S>, bits: &BitSlice<u8, Msb0>) -> Option<(S, usize)> {
    let mut node = root;
    for (consumed, bit) in bits.iter().enumerate() {
        let idx = usize::from(*bit);
        node = node.children[idx].as_deref()?;
        if let Some(symbol) = node.symbol {
            return Some((symbol, consumed + 1));
        }
    }
    None
}

/// A bidirectional Huffman code table: `symbol -> bits` for encoding, and a
/// prefix trie for `bits -> symbol` decoding in O(codeword length).
pub struct HuffmanTable<S> {
    forward: HashMap<S, Bits>,
    root: TrieNode<S>,
}

impl<S: Copy + Eq + Hash> HuffmanTable<S> {
    fn empty() -> Self {
        HuffmanTable { forward: HashMap::new(), root: TrieNode::new() }
    }

    fn insert(&mut self, symbol: S, bits: Bits) {
        trie_insert(&mut self.root, &bits, symbol);
        self.forward.insert(symbol, bits);
    }

    /// Look up the codeword for `symbol`.
    pub fn encode(&self, symbol: &S) -> Option<&Bits> {
        self.forward.get(symbol)
    }

    /// Find the unique codeword that prefixes `bits`, returning the symbol
    /// and how many bits it consumed.
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Option<(S, usize)> {
        trie_decode(&self.root, bits)
    }
}

fn parse_bits(s: &str) -> Bits {
    s.chars().map(|c| c == '1').collect()
}

fn parse_table<S: Copy + Eq + Hash>(content: &str, to_symbol: impl Fn(u8) -> S) -> HuffmanTable<S> {
    let mut table = HuffmanTable::empty();
    for line in content.lines() {
        let mut fields = line.split('\t');
        let hex = fields.next().expect("symbol column");
        let _length = fields.next().expect("length column");
        let bits = fields.next().expect("bits column");
        let byte = u8::from_str_radix(hex, 16).expect("hex symbol");
        table.insert(to_symbol(byte), parse_bits(bits));
    }
    table
}

const DC_LUMINANCE_TEXT: &str = "0\t2\t00
1\t3\t010
2\t3\t011
3\t3\t100
4\t3\t101
5\t3\t110
6\t4\t1110
7\t5\t11110
8\t6\t111110
9\t7\t1111110
A\t8\t11111110
B\t9\t111111110";

const DC_CHROMINANCE_TEXT: &str = "0\t2\t00
1\t2\t01
2\t2\t10
3\t3\t110
4\t4\t1110
5\t5\t11110
6\t6\t111110
7\t7\t1111110
8\t8\t11111110
9\t9\t111111110
A\t10\t1111111110
B\t11\t11111111110";

const AC_LUMINANCE_TEXT: &str = "00\t4\t1010
01\t2\t00
02\t2\t01
03\t3\t100
04\t4\t1011
05\t5\t11010
06\t7\t1111000
07\t8\t11111000
08\t10\t1111110110
09\t16\t1111111110000010
0A\t16\t1111111110000011
11\t4\t1100
12\t5\t11011
13\t7\t1111001
14\t9\t111110110
15\t11\t11111110110
16\t16\t1111111110000100
17\t16\t1111111110000101
18\t16\t1111111110000110
19\t16\t1111111110000111
1A\t16\t1111111110001000
21\t5\t11100
22\t8\t11111001
23\t10\t1111110111
24\t12\t111111110100
25\t16\t1111111110001001
26\t16\t1111111110001010
27\t16\t1111111110001011
28\t16\t1111111110001100
29\t16\t1111111110001101
2A\t16\t1111111110001110
31\t6\t111010
32\t9\t111110111
33\t12\t111111110101
34\t16\t1111111110001111
35\t16\t1111111110010000
36\t16\t1111111110010001
37\t16\t1111111110010010
38\t16\t1111111110010011
39\t16\t1111111110010100
3A\t16\t1111111110010101
41\t6\t111011
42\t10\t1111111000
43\t16\t1111111110010110
44\t16\t1111111110010111
45\t16\t1111111110011000
46\t16\t1111111110011001
47\t16\t1111111110011010
48\t16\t1111111110011011
49\t16\t1111111110011100
4A\t16\t1111111110011101
51\t7\t1111010
52\t11\t11111110111
53\t16\t1111111110011110
54\t16\t1111111110011111
55\t16\t1111111110100000
56\t16\t1111111110100001
57\t16\t1111111110100010
58\t16\t1111111110100011
59\t16\t1111111110100100
5A\t16\t1111111110100101
61\t7\t1111011
62\t12\t111111110110
63\t16\t1111111110100110
64\t16\t1111111110100111
65\t16\t1111111110101000
66\t16\t1111111110101001
67\t16\t1111111110101010
68\t16\t1111111110101011
69\t16\t1111111110101100
6A\t16\t1111111110101101
71\t8\t11111010
72\t12\t111111110111
73\t16\t1111111110101110
74\t16\t1111111110101111
75\t16\t1111111110110000
76\t16\t1111111110110001
77\t16\t1111111110110010
78\t16\t1111111110110011
79\t16\t1111111110110100
7A\t16\t1111111110110101
81\t9\t111111000
82\t15\t111111111000000
83\t16\t1111111110110110
84\t16\t1111111110110111
85\t16\t1111111110111000
86\t16\t1111111110111001
87\t16\t1111111110111010
88\t16\t1111111110111011
89\t16\t1111111110111100
8A\t16\t1111111110111101
91\t9\t111111001
92\t16\t1111111110111110
93\t16\t1111111110111111
94\t16\t1111111111000000
95\t16\t1111111111000001
96\t16\t1111111111000010
97\t16\t1111111111000011
98\t16\t1111111111000100
99\t16\t1111111111000101
9A\t16\t1111111111000110
A1\t9\t111111010
A2\t16\t1111111111000111
A3\t16\t1111111111001000
A4\t16\t1111111111001001
A5\t16\t1111111111001010
A6\t16\t1111111111001011
A7\t16\t1111111111001100
A8\t16\t1111111111001101
A9\t16\t1111111111001110
AA\t16\t1111111111001111
B1\t10\t1111111001
B2\t16\t1111111111010000
B3\t16\t1111111111010001
B4\t16\t1111111111010010
B5\t16\t1111111111010011
B6\t16\t1111111111010100
B7\t16\t1111111111010101
B8\t16\t1111111111010110
B9\t16\t1111111111010111
BA\t16\t1111111111011000
C1\t10\t1111111010
C2\t16\t1111111111011001
C3\t16\t1111111111011010
C4\t16\t1111111111011011
C5\t16\t1111111111011100
C6\t16\t1111111111011101
C7\t16\t1111111111011110
C8\t16\t1111111111011111
C9\t16\t1111111111100000
CA\t16\t1111111111100001
D1\t11\t11111111000
D2\t16\t1111111111100010
D3\t16\t1111111111100011
D4\t16\t1111111111100100
D5\t16\t1111111111100101
D6\t16\t1111111111100110
D7\t16\t1111111111100111
D8\t16\t1111111111101000
D9\t16\t1111111111101001
DA\t16\t1111111111101010
E1\t16\t1111111111101011
E2\t16\t1111111111101100
E3\t16\t1111111111101101
E4\t16\t1111111111101110
E5\t16\t1111111111101111
E6\t16\t1111111111110000
E7\t16\t1111111111110001
E8\t16\t1111111111110010
E9\t16\t1111111111110011
EA\t16\t1111111111110100
F0\t11\t11111111001
F1\t16\t1111111111110101
F2\t16\t1111111111110110
F3\t16\t1111111111110111
F4\t16\t1111111111111000
F5\t16\t1111111111111001
F6\t16\t1111111111111010
F7\t16\t1111111111111011
F8\t16\t1111111111111100
F9\t16\t1111111111111101
FA\t16\t1111111111111110";

const AC_CHROMINANCE_TEXT: &str = "00\t2\t00
01\t2\t01
02\t3\t100
03\t4\t1010
04\t5\t11000
05\t5\t11001
06\t6\t111000
07\t7\t1111000
08\t9\t111110100
09\t10\t1111110110
0A\t12\t111111110100
11\t4\t1011
12\t6\t111001
13\t8\t11110110
14\t9\t111110101
15\t11\t11111110110
16\t12\t111111110101
17\t16\t1111111110001000
18\t16\t1111111110001001
19\t16\t1111111110001010
1A\t16\t1111111110001011
21\t5\t11010
22\t8\t11110111
23\t10\t1111110111
24\t12\t111111110110
25\t15\t111111111000010
26\t16\t1111111110001100
27\t16\t1111111110001101
28\t16\t1111111110001110
29\t16\t1111111110001111
2A\t16\t1111111110010000
31\t5\t11011
32\t8\t11111000
33\t10\t1111111000
34\t12\t111111110111
35\t16\t1111111110010001
36\t16\t1111111110010010
37\t16\t1111111110010011
38\t16\t1111111110010100
39\t16\t1111111110010101
3A\t16\t1111111110010110
41\t6\t111010
42\t9\t111110110
43\t16\t1111111110010111
44\t16\t1111111110011000
45\t16\t1111111110011001
46\t16\t1111111110011010
47\t16\t1111111110011011
48\t16\t1111111110011100
49\t16\t1111111110011101
4A\t16\t1111111110011110
51\t6\t111011
52\t10\t1111111001
53\t16\t1111111110011111
54\t16\t1111111110100000
55\t16\t1111111110100001
56\t16\t1111111110100010
57\t16\t1111111110100011
58\t16\t1111111110100100
59\t16\t1111111110100101
5A\t16\t1111111110100110
61\t7\t1111001
62\t11\t11111110111
63\t16\t1111111110100111
64\t16\t1111111110101000
65\t16\t1111111110101001
66\t16\t1111111110101010
67\t16\t1111111110101011
68\t16\t1111111110101100
69\t16\t1111111110101101
6A\t16\t1111111110101110
71\t7\t1111010
72\t11\t11111111000
73\t16\t1111111110101111
74\t16\t1111111110110000
75\t16\t1111111110110001
76\t16\t1111111110110010
77\t16\t1111111110110011
78\t16\t1111111110110100
79\t16\t1111111110110101
7A\t16\t1111111110110110
81\t8\t11111001
82\t16\t1111111110110111
83\t16\t1111111110111000
84\t16\t1111111110111001
85\t16\t1111111110111010
86\t16\t1111111110111011
87\t16\t1111111110111100
88\t16\t1111111110111101
89\t16\t1111111110111110
8A\t16\t1111111110111111
91\t9\t111110111
92\t16\t1111111111000000
93\t16\t1111111111000001
94\t16\t1111111111000010
95\t16\t1111111111000011
96\t16\t1111111111000100
97\t16\t1111111111000101
98\t16\t1111111111000110
99\t16\t1111111111000111
9A\t16\t1111111111001000
A1\t9\t111111000
A2\t16\t1111111111001001
A3\t16\t1111111111001010
A4\t16\t1111111111001011
A5\t16\t1111111111001100
A6\t16\t1111111111001101
A7\t16\t1111111111001110
A8\t16\t1111111111001111
A9\t16\t1111111111010000
AA\t16\t1111111111010001
B1\t9\t111111001
B2\t16\t1111111111010010
B3\t16\t1111111111010011
B4\t16\t1111111111010100
B5\t16\t1111111111010101
B6\t16\t1111111111010110
B7\t16\t1111111111010111
B8\t16\t1111111111011000
B9\t16\t1111111111011001
BA\t16\t1111111111011010
C1\t9\t111111010
C2\t16\t1111111111011011
C3\t16\t1111111111011100
C4\t16\t1111111111011101
C5\t16\t1111111111011110
C6\t16\t1111111111011111
C7\t16\t1111111111100000
C8\t16\t1111111111100001
C9\t16\t1111111111100010
CA\t16\t1111111111100011
D1\t11\t11111111001
D2\t16\t1111111111100100
D3\t16\t1111111111100101
D4\t16\t1111111111100110
D5\t16\t1111111111100111
D6\t16\t1111111111101000
D7\t16\t1111111111101001
D8\t16\t1111111111101010
D9\t16\t1111111111101011
DA\t16\t1111111111101100
E1\t14\t11111111100000
E2\t16\t1111111111101101
E3\t16\t1111111111101110
E4\t16\t1111111111101111
E5\t16\t1111111111110000
E6\t16\t1111111111110001
E7\t16\t1111111111110010
E8\t16\t1111111111110011
E9\t16\t1111111111110100
EA\t16\t1111111111110101
F0\t10\t1111111010
F1\t15\t111111111000011
F2\t16\t1111111111110110
F3\t16\t1111111111110111
F4\t16\t1111111111111000
F5\t16\t1111111111111001
F6\t16\t1111111111111010
F7\t16\t1111111111111011
F8\t16\t1111111111111100
F9\t16\t1111111111111101
FA\t16\t1111111111111110";

lazy_static! {
    /// DC luminance table, keyed by `size` (0..=11).
    pub static ref DC_LUMINANCE: HuffmanTable<u8> = parse_table(DC_LUMINANCE_TEXT, |b| b);
    /// DC chrominance table, keyed by `size` (0..=11).
    pub static ref DC_CHROMINANCE: HuffmanTable<u8> = parse_table(DC_CHROMINANCE_TEXT, |b| b);
    /// AC luminance table, keyed by `(run, size)`.
    pub static ref AC_LUMINANCE: HuffmanTable<AcKey> =
        parse_table(AC_LUMINANCE_TEXT, |b| (b >> 4, b & 0x0F));
    /// AC chrominance table, keyed by `(run, size)`.
    pub static ref AC_CHROMINANCE: HuffmanTable<AcKey> =
        parse_table(AC_CHROMINANCE_TEXT, |b| (b >> 4, b & 0x0F));
}

use crate::block::LayerType;

/// Select the DC table for a layer type.
pub fn dc_table(layer: LayerType) -> &'static HuffmanTable<u8> {
    match layer {
        LayerType::Luminance => &DC_LUMINANCE,
        LayerType::Chrominance => &DC_CHROMINANCE,
    }
}

/// Select the AC table for a layer type.
pub fn ac_table(layer: LayerType) -> &'static HuffmanTable<AcKey> {
    match layer {
        LayerType::Luminance => &AC_LUMINANCE,
        LayerType::Chrominance => &AC_CHROMINANCE,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bits_of(s: &str) -> Bits {
        parse_bits(s)
    }

    #[test]
    fn wire_format_spot_checks() {
        assert_eq!(DC_LUMINANCE.encode(&0).unwrap(), &bits_of("00"));
        assert_eq!(DC_LUMINANCE.encode(&11).unwrap(), &bits_of("111111110"));
        assert_eq!(DC_CHROMINANCE.encode(&11).unwrap(), &bits_of("11111111110"));
        assert_eq!(AC_LUMINANCE.encode(&AC_EOB).unwrap(), &bits_of("1010"));
        assert_eq!(AC_LUMINANCE.encode(&AC_ZRL).unwrap(), &bits_of("11111111001"));
        assert_eq!(AC_CHROMINANCE.encode(&AC_EOB).unwrap(), &bits_of("00"));
        assert_eq!(AC_CHROMINANCE.encode(&AC_ZRL).unwrap(), &bits_of("1111111010"));
    }

    #[test]
    fn the_deviating_chroma_ac_entry_14_1_is_kept_verbatim() {
        assert_eq!(
            AC_CHROMINANCE.encode(&(14, 1)).unwrap(),
            &bits_of("11111111100000")
        );
    }

    #[test]
    fn p5_every_table_entry_round_trips_through_decode() {
        for (symbol, bits) in DC_LUMINANCE.forward.iter() {
            let (decoded, len) = DC_LUMINANCE.decode(bits).unwrap();
            assert_eq!(decoded, *symbol);
            assert_eq!(len, bits.len());
        }
        for (symbol, bits) in AC_CHROMINANCE.forward.iter() {
            let (decoded, len) = AC_CHROMINANCE.decode(bits).unwrap();
            assert_eq!(decoded, *symbol);
            assert_eq!(len, bits.len());
        }
    }

    #[test]
    fn q1_table_is_prefix_free_no_two_codes_share_a_prefix() {
        let codes: Vec<&Bits> = AC_LUMINANCE.forward.values().collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let shorter = a.len().min(b.len());
                assert_ne!(&a[..shorter], &b[..shorter]);
            }
        }
    }

    #[test]
    fn decode_returns_none_for_unmatched_bits() {
        let garbage = bits_of("111111111111111111");
        assert!(AC_LUMINANCE.decode(&garbage).is_none());
    }
}
