//! Multi-limb integer extraction.

use num_bigint::{BigInt, BigUint, Sign};

use crate::constants;
use crate::decode::array::{self, BufferEncoding};
use crate::gateway::Gateway;
use crate::layout;
use crate::session::Session;
use crate::utils::Result;

/// Assemble a bignum's magnitude from its 64-bit limbs (least significant
/// first) and apply the header's sign bit.
pub fn read_value<G: Gateway + ?Sized>(
    session: &mut Session<'_, G>,
    address: u64,
    flags: u64,
) -> Result<BigInt> {
    let nlimbs = session.read_word(address + layout::OFF_PAYLOAD)? as usize;
    let base = match array::encoding(session, address, flags)? {
        BufferEncoding::Embedded => address + layout::OFF_BODY,
        BufferEncoding::Heap => session.read_word(address + layout::OFF_BODY)?,
    };
    let limbs = array::read_words(session, base, nlimbs)?;

    let mut bytes = Vec::with_capacity(nlimbs * 8);
    for limb in &limbs {
        bytes.extend_from_slice(&limb.to_le_bytes());
    }
    let magnitude = BigUint::from_bytes_le(&bytes);
    let sign = if flags & session.constant(constants::FL_BIGNUM_POSITIVE)? != 0 {
        Sign::Plus
    } else {
        Sign::Minus
    };
    // from_biguint normalizes a zero magnitude to an unsigned zero.
    Ok(BigInt::from_biguint(sign, magnitude))
}
