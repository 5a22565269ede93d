//! Gamma-2.2 LUTs for 8-bit <-> linear conversion (§4.2, §6 color-space
//! contract). Built once and shared; decode and encode are each simple
//! table/power lookups so the LUT buys us a measurable win over calling
//! `powf` per texel.

use std::sync::LazyLock;

pub const GAMMA: f32 = 2.2;
/// Linear values are clamped below 1 before encoding so the round-trip
/// never saturates to a value that can't be represented by 255 exactly.
pub const ENCODE_CLAMP_MAX: f32 = 1.0 - 1e-5;

/// `decode[u8_value] = (u8_value / 255)^GAMMA`
pub static DECODE_LUT: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut lut = [0.0f32; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = (i as f32 / 255.0).powf(GAMMA);
    }
    lut
});

/// Decode a single 8-bit sRGB-like byte to linear using the shared LUT.
pub fn decode_u8(byte: u8) -> f32 {
    DECODE_LUT[byte as usize]
}

/// Encode a linear value back to an 8-bit gamma-space byte.
pub fn encode_u8(linear: f32) -> u8 {
    let clamped = linear.clamp(0.0, ENCODE_CLAMP_MAX);
    (clamped.powf(1.0 / GAMMA) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_within_one_lsb() {
        for byte in 0..=255u8 {
            let linear = decode_u8(byte);
            let back = encode_u8(linear);
            let diff = (back as i16 - byte as i16).abs();
            assert!(diff <= 1, "byte {byte} round-tripped to {back}");
        }
    }

    #[test]
    fn decode_is_monotonic() {
        for byte in 0..255u8 {
            assert!(decode_u8(byte) <= decode_u8(byte + 1));
        }
    }

    #[test]
    fn zero_and_max_bounds() {
        assert_eq!(decode_u8(0), 0.0);
        assert!((decode_u8(255) - 1.0).abs() < 1e-5);
    }
}
