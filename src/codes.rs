//! Random identifiers handed to people: order codes, email verification
//! codes and tailor confirmation tokens.

use rand::{Rng, distr::Alphanumeric};

const ORDER_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const ORDER_CODE_LEN: usize = 8;
pub const CONFIRMATION_TOKEN_LEN: usize = 64;

pub fn order_code() -> String {
    let mut rng = rand::rng();
    (0..ORDER_CODE_LEN)
        .map(|_| ORDER_CODE_CHARSET[rng.random_range(0..ORDER_CODE_CHARSET.len())] as char)
        .collect()
}

/// Six decimal digits, zero padded.
pub fn verification_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000u32))
}

pub fn confirmation_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(CONFIRMATION_TOKEN_LEN)
        .map(char::from)
        .collect()
}
