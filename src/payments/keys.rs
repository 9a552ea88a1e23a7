//! PIX key checks and identifier helpers.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::payments::types::{PaymentError, PaymentResult, PixKeyType, WithdrawParams};

/// Minimum length of an arbitrary (EVP) key.
pub const MIN_EVP_LEN: usize = 32;

/// Minimum length of a gateway transaction id.
pub const MIN_TRANSACTION_ID_LEN: usize = 8;

/// Keep only ASCII digits.
pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Fresh externally-visible id for charges and payouts: `PATO{millis}{0..999}`.
pub fn generate_external_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("PATO{}{}", millis, suffix)
}

/// CPF with valid check digits.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = only_digits(cpf).chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        match 11 - (sum % 11) {
            10 | 11 => 0,
            rev => rev,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Area code plus number: 10 or 11 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    (10..=11).contains(&only_digits(phone).len())
}

/// Check a PIX key against its declared type.
pub fn validate_pix_key(key_type: PixKeyType, key: &str) -> PaymentResult<()> {
    let key = key.trim();
    let invalid = |reason| PaymentError::InvalidPixKey { key_type, reason };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }
    match key_type {
        PixKeyType::Cpf if !is_valid_cpf(key) => Err(invalid("invalid or incomplete CPF")),
        PixKeyType::Email if !is_valid_email(key) => Err(invalid("invalid e-mail format")),
        PixKeyType::Phone if !is_valid_phone(key) => Err(invalid("incomplete phone (area code + number)")),
        PixKeyType::Random if key.len() < MIN_EVP_LEN => Err(invalid("random key too short")),
        _ => Ok(()),
    }
}

/// Caller-side checks run before a payout is sent.
/// `available` is the last known balance, if any.
pub fn validate_withdrawal(params: &WithdrawParams, available: Option<f64>) -> PaymentResult<()> {
    validate_pix_key(params.key_type, &params.pix_key)?;

    if !params.amount.is_finite() || params.amount <= 0.0 {
        return Err(PaymentError::InvalidAmount);
    }
    if let Some(available) = available {
        if params.amount > available {
            return Err(PaymentError::InsufficientBalance {
                requested: params.amount,
                available,
            });
        }
    }
    Ok(())
}

/// Reject ids too short to be real gateway ids, or carrying characters
/// that would change the request path (`/`, `?`, `#`, `%`, whitespace).
pub fn validate_transaction_id(id: &str) -> PaymentResult<&str> {
    let id = id.trim();
    let path_safe = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if id.len() < MIN_TRANSACTION_ID_LEN || !path_safe {
        return Err(PaymentError::InvalidTransactionId);
    }
    Ok(id)
}
