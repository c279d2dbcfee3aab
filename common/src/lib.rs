use num_bigint::BigInt as NumBigInt;
use substreams::scalar::{BigDecimal, BigInt};
use substreams::Hex;

/// Format BigInt as a string, handling potential edge cases
#[inline]
pub fn format_bigint(value: &BigInt) -> String {
    value.to_string()
}

/// Ensure address has 0x prefix
#[inline]
pub fn ensure_0x_prefix(address: &str) -> String {
    if address.starts_with("0x") || address.starts_with("0X") {
        address.to_string()
    } else {
        format!("0x{address}")
    }
}

/// Normalise an address to lowercase with a 0x prefix so it can be used as an
/// entity key regardless of how it was written in configuration or events.
#[inline]
pub fn normalize_address(address: &str) -> String {
    ensure_0x_prefix(address.trim()).to_lowercase()
}

/// Decode an address from a 32-byte word (indexed topic or ABI-encoded data)
///
/// ## EVM Address Storage:
/// - Addresses are 20 bytes, right-aligned in a 32-byte word
/// - The 12 leading bytes are zero padding
///
/// ## Returns:
/// - The lowercase `0x`-prefixed address, or `None` if the word is not 32 bytes
#[inline]
pub fn word_to_address(bytes: &[u8]) -> Option<String> {
    if bytes.len() != 32 {
        return None;
    }

    Some(ensure_0x_prefix(&Hex(&bytes[12..32]).to_string()))
}

/// Convert unsigned uint256 bytes to BigInt
///
/// ## Parameters:
/// - `bytes`: Must be exactly 32 bytes representing an unsigned 256-bit integer
///
/// ## Returns:
/// - The BigInt representation of the uint256 value, or 0 if invalid input
#[inline]
pub fn uint256_to_bigint(bytes: &[u8]) -> BigInt {
    if bytes.len() != 32 {
        return BigInt::zero();
    }

    let bigint = NumBigInt::from_bytes_be(num_bigint::Sign::Plus, bytes);
    BigInt::from(bigint)
}

/// Convert unsigned uint112 bytes (stored in 32 bytes) to BigInt
///
/// ## Why uint112:
/// - Classic constant-product pools use uint112 for reserve values
/// - When stored in a 32-byte word, uint112 is right-aligned (last 14 bytes)
///
/// ## Parameters:
/// - `bytes`: Must be exactly 32 bytes with uint112 in the last 14 bytes
///
/// ## Returns:
/// - The BigInt representation of the uint112 value, or 0 if invalid input
#[inline]
pub fn uint112_to_bigint(bytes: &[u8]) -> BigInt {
    if bytes.len() != 32 {
        return BigInt::zero();
    }

    // uint112 is stored in the last 14 bytes of the 32-byte word
    let start = bytes.len().saturating_sub(14);
    let bigint = NumBigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes[start..]);
    BigInt::from(bigint)
}

/// Check if a BigDecimal value is zero
#[inline]
pub fn is_zero(big_decimal: &BigDecimal) -> bool {
    big_decimal == &BigDecimal::zero()
}

/// Divide two decimals, yielding zero instead of failing when the divisor is zero
pub fn safe_div(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    if is_zero(denominator) {
        return BigDecimal::zero();
    }

    numerator.clone() / denominator.clone()
}

/// 10^decimals as an exact decimal
pub fn exponent_to_big_decimal(decimals: u64) -> BigDecimal {
    let mut result = BigDecimal::one();
    for _ in 0..decimals {
        result = result * BigDecimal::from(10);
    }

    result
}

/// Scale a raw integer token amount down to human units
///
/// ## Parameters:
/// - `amount`: Raw on-chain amount (e.g. `1500000` for 1.5 USDC)
/// - `decimals`: The token's decimal count
///
/// ## Returns:
/// - `amount / 10^decimals`, computed exactly; a zero decimal count returns
///   the amount unchanged
pub fn convert_token_to_decimal(amount: &BigInt, decimals: u64) -> BigDecimal {
    let value = BigDecimal::from(amount.clone());
    if decimals == 0 {
        return value;
    }

    value / exponent_to_big_decimal(decimals)
}

/// Scale a human-unit amount back to the raw integer representation,
/// truncating anything below the token's smallest unit
pub fn convert_decimal_to_raw(value: &BigDecimal, decimals: u64) -> BigInt {
    (value.clone() * exponent_to_big_decimal(decimals)).to_bigint()
}

/// Format a BigDecimal to a string with at most 18 decimal places
/// Removes trailing zeros and decimal point if unnecessary
#[inline]
pub fn format_bigdecimal(big_decimal: &BigDecimal) -> String {
    let mut decimal_string = big_decimal.to_string();

    if let Some(decimal_point_index) = decimal_string.find('.') {
        // Truncate to maximum 18 decimal places
        let truncate_position = usize::min(decimal_point_index + 1 + 18, decimal_string.len());
        decimal_string.truncate(truncate_position);

        // Remove trailing zeros
        while decimal_string.ends_with('0') {
            decimal_string.pop();
        }

        // Remove decimal point if no decimals remain
        if decimal_string.ends_with('.') {
            decimal_string.pop();
        }
    }

    if decimal_string.is_empty() {
        "0".into()
    } else {
        decimal_string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn word(tail: &[u8]) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[32 - tail.len()..].copy_from_slice(tail);
        bytes
    }

    #[test]
    fn decodes_right_aligned_words() {
        assert_eq!(uint256_to_bigint(&word(&[0x03, 0xe8])), BigInt::from(1000));
        assert_eq!(uint112_to_bigint(&word(&[0x01, 0x00])), BigInt::from(256));
        assert_eq!(uint256_to_bigint(&[0u8; 31]), BigInt::zero());
    }

    #[test]
    fn decodes_addresses_from_topics() {
        let mut topic = [0u8; 32];
        topic[12..].copy_from_slice(&[0xab; 20]);

        assert_eq!(
            word_to_address(&topic).unwrap(),
            format!("0x{}", "ab".repeat(20))
        );
        assert!(word_to_address(&topic[1..]).is_none());
    }

    #[test]
    fn normalizes_addresses() {
        assert_eq!(normalize_address("0xABcd"), "0xabcd");
        assert_eq!(normalize_address("ABCD"), "0xabcd");
    }

    #[test]
    fn converts_raw_amounts_to_decimal() {
        let raw = BigInt::from_str("1500000").unwrap();

        assert_eq!(
            convert_token_to_decimal(&raw, 6),
            BigDecimal::from_str("1.5").unwrap()
        );
        assert_eq!(
            convert_token_to_decimal(&raw, 0),
            BigDecimal::from_str("1500000").unwrap()
        );
    }

    #[test]
    fn decimal_conversion_round_trips() {
        let raw = BigInt::from_str("123456789012345678901234567890").unwrap();

        for decimals in [0u64, 6, 8, 18, 24] {
            let scaled = convert_token_to_decimal(&raw, decimals);
            assert_eq!(convert_decimal_to_raw(&scaled, decimals), raw);
        }
    }

    #[test]
    fn safe_div_guards_zero() {
        let ten = BigDecimal::from(10);

        assert_eq!(safe_div(&ten, &BigDecimal::zero()), BigDecimal::zero());
        assert_eq!(safe_div(&ten, &BigDecimal::from(4)), BigDecimal::from_str("2.5").unwrap());
    }

    #[test]
    fn formats_decimals_without_trailing_zeros() {
        assert_eq!(format_bigdecimal(&BigDecimal::from_str("1.500").unwrap()), "1.5");
        assert_eq!(format_bigdecimal(&BigDecimal::from_str("42").unwrap()), "42");
    }
}
