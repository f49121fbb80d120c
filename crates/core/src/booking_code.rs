//! Human-readable reservation codes.
//!
//! A code is six random characters from `[A-Z0-9]` followed by the issue
//! date as `YYMMDD`, e.g. `K7Q2ZD240815`. Uniqueness against stored codes is
//! enforced by the repository, which retries on collision.

use chrono::NaiveDate;
use rand::Rng;

/// Characters allowed in the random prefix.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random prefix.
pub const PREFIX_LEN: usize = 6;

/// Total code length: prefix plus `YYMMDD`.
pub const CODE_LEN: usize = PREFIX_LEN + 6;

/// Generate a code for `issued_on` using the supplied random source.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, issued_on: NaiveDate) -> String {
    let mut code = String::with_capacity(CODE_LEN);
    for _ in 0..PREFIX_LEN {
        let idx = rng.random_range(0..CHARSET.len());
        code.push(char::from(CHARSET[idx]));
    }
    code.push_str(&issued_on.format("%y%m%d").to_string());
    code
}

/// Generate a code for today (UTC) from the thread-local generator.
pub fn generate_today() -> String {
    generate(&mut rand::rng(), chrono::Utc::now().date_naive())
}

/// Whether `code` has the `^[A-Z0-9]{6}\d{6}$` shape.
pub fn is_well_formed(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == CODE_LEN
        && bytes[..PREFIX_LEN]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && bytes[PREFIX_LEN..].iter().all(u8::is_ascii_digit)
}
