//! Content hashing for style text.
//!
//! Identifiers must agree between processes so that ids rendered on a server
//! can be hydrated on a client. The hash is MurmurHash2 (32-bit) over the
//! low byte of each UTF-16 code unit, seeded with the input length and
//! rendered in base 36.

const MURMUR_M: u32 = 0x5bd1_e995;

/// Deterministic identifier for `input`.
///
/// ```
/// use horizon_lattice_stylegen::hash_string;
///
/// assert_eq!(hash_string("color:red;"), hash_string("color:red;"));
/// assert_ne!(hash_string("color:red;"), hash_string("color:blue;"));
/// ```
pub fn hash_string(input: &str) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    to_base36(murmur2(&units, units.len() as u32))
}

fn murmur2(units: &[u16], seed: u32) -> u32 {
    let byte = |i: usize| u32::from(units[i] & 0xff);
    let mut h = seed ^ units.len() as u32;

    let mut chunks = units.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from(chunk[0] & 0xff)
            | (u32::from(chunk[1] & 0xff) << 8)
            | (u32::from(chunk[2] & 0xff) << 16)
            | (u32::from(chunk[3] & 0xff) << 24);
        k = k.wrapping_mul(MURMUR_M);
        k ^= k >> 24;
        k = k.wrapping_mul(MURMUR_M);
        h = h.wrapping_mul(MURMUR_M) ^ k;
    }

    let tail = units.len() - chunks.remainder().len();
    let rest = units.len() - tail;
    if rest >= 3 {
        h ^= byte(tail + 2) << 16;
    }
    if rest >= 2 {
        h ^= byte(tail + 1) << 8;
    }
    if rest >= 1 {
        h ^= byte(tail);
        h = h.wrapping_mul(MURMUR_M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(MURMUR_M);
    h ^= h >> 15;
    h
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(7);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
