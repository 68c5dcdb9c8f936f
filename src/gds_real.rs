//! gdsii eight byte real
//!
//! in gdsii stream file, eight byte real is defined as
//! SEEEEEEE MMMMMMMM MMMMMMMM MMMMMMMM
//! MMMMMMMM MMMMMMMM MMMMMMMM MMMMMMMM
//! and value = (-1)^S*16^(E as u32 - 64)*(M as u64 /2^56)
//! for short value = (-1)^S*2^(4*E as u32 - 312)*(M as u64)
//!
//! by the way double of IEEE 754 is defined as
//! SEEEEEEE EEEEMMMM MMMMMMMM MMMMMMMM
//! MMMMMMMM MMMMMMMM MMMMMMMM MMMMMMMM
//! and value = (-1)^S*2^(E as u32 -1023)*(1+M as u64/2^52)

use crate::gds_error::{GdsError, GdsResult};

/// magnitudes below this are written as gdsii zero
pub const REAL_ZERO_THRESHOLD: f64 = 1e-77;

const MANTISSA_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// convert IEEE 754 f64 to gdsii eight byte real, bytes in stream order
pub fn encode_real(v: f64) -> GdsResult<[u8; 8]> {
    if !v.is_finite() {
        return Err(range_err!("{} can not be written as gdsii real", v));
    }
    let magnitude = v.abs();
    if magnitude < REAL_ZERO_THRESHOLD {
        return Ok([0; 8]);
    }

    // first guess from log16, may be off by one power of 16
    let mut exponent = (magnitude.log2() / 4.0).floor() as i32 + 1;
    let mut mantissa = magnitude / 2_f64.powi(4 * exponent);
    while mantissa >= 1.0 {
        mantissa /= 16.0;
        exponent += 1;
    }
    while mantissa < 1.0 / 16.0 {
        mantissa *= 16.0;
        exponent -= 1;
    }

    if !(1.0 / 16.0..1.0).contains(&mantissa) {
        return Err(range_err!(
            "mantissa of {} must be in [1/16, 1), it is {}",
            v,
            mantissa
        ));
    }
    if !(-64..63).contains(&exponent) {
        return Err(range_err!(
            "exponent of {} must be in [-64, 63), it is {}",
            v,
            exponent
        ));
    }

    // mantissa in [1/16, 1) carries at most 53 significant bits, scaling by 2^56 is exact
    let bits = (mantissa * 2_f64.powi(56)) as u64 & MANTISSA_MASK;
    let mut bytes = bits.to_be_bytes();
    bytes[0] = (exponent + 64) as u8;
    if v.is_sign_negative() {
        bytes[0] |= 0x80;
    }
    Ok(bytes)
}

/// convert gdsii eight byte real to IEEE 754 f64
pub fn decode_real(byte: &[u8]) -> GdsResult<f64> {
    let byte: [u8; 8] = match byte.try_into() {
        Ok(b) => b,
        Err(_) => {
            return Err(GdsError::format(
                0,
                None,
                &format!("eight byte real needs 8 bytes, got {}", byte.len()),
            ))
        }
    };
    Ok(real_value(byte))
}

fn real_value(byte: [u8; 8]) -> f64 {
    // 0x7F is 0b0111_1111, get all E bit, convert to i32
    let exponent = (byte[0] & 0x7F) as i32;
    let mantissa = u64::from_be_bytes(byte) & MANTISSA_MASK;
    let result = mantissa as f64 * 2_f64.powi(4_i32 * exponent - 312_i32);
    let sign = (byte[0] & 0x80) != 0;

    if sign {
        -result
    } else {
        result
    }
}

/// eight byte real as read from or written to a stream
///
/// keeps the raw bytes so a decoded record is written back bit for bit,
/// even when another tool stored an unnormalized mantissa
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GdsReal {
    raw: [u8; 8],
    value: f64,
}

impl GdsReal {
    pub fn from_f64(value: f64) -> GdsResult<GdsReal> {
        Ok(GdsReal::from_bytes(encode_real(value)?))
    }

    pub fn from_bytes(raw: [u8; 8]) -> GdsReal {
        GdsReal {
            raw,
            value: real_value(raw),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bytes(&self) -> [u8; 8] {
        self.raw
    }
}
