//! IBAN value object and generators.
//!
//! Generated IBANs have the shape `CC kk BBBB NNNNNNNNNNNNNNNN`: country code,
//! ISO 13616 check digits, a four character bank code and a sixteen digit
//! account number.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use tally_core::{DomainError, DomainResult, ValueObject};

const ACCOUNT_NUMBER_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iban(String);

impl ValueObject for Iban {}

impl Iban {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Assemble an IBAN, computing its check digits.
    pub fn compose(country: &str, bban: &str) -> Self {
        let check = 98 - mod97(&format!("{bban}{country}00"));
        Self(format!("{country}{check:02}{bban}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ISO 13616 mod-97 check.
    pub fn is_valid_checksum(&self) -> bool {
        let s = &self.0;
        if s.len() < 5 || !s.is_ascii() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        let (head, tail) = s.split_at(4);
        mod97(&format!("{tail}{head}")) == 1
    }
}

impl core::fmt::Display for Iban {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remainder of the letter-expanded string modulo 97 (A=10 … Z=35).
fn mod97(s: &str) -> u32 {
    s.chars().fold(0u32, |acc, c| match c.to_digit(36) {
        Some(d) if d >= 10 => (acc * 100 + d) % 97,
        Some(d) => (acc * 10 + d) % 97,
        None => acc,
    })
}

/// Source of fresh, globally unique IBANs for new accounts.
pub trait IbanGenerator: Send + Sync {
    fn generate(&self) -> Iban;
}

impl<G> IbanGenerator for std::sync::Arc<G>
where
    G: IbanGenerator + ?Sized,
{
    fn generate(&self) -> Iban {
        (**self).generate()
    }
}

/// Country + bank code prefix shared by the generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbanPrefix {
    country: String,
    bank_code: String,
}

impl IbanPrefix {
    pub fn new(country: &str, bank_code: &str) -> DomainResult<Self> {
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::invalid_field(
                "country",
                "IBAN country must be two uppercase letters",
            ));
        }
        if bank_code.len() != 4 || !bank_code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(DomainError::invalid_field(
                "bankCode",
                "IBAN bank code must be four uppercase letters or digits",
            ));
        }
        Ok(Self {
            country: country.to_string(),
            bank_code: bank_code.to_string(),
        })
    }

    fn iban(&self, account_number: &str) -> Iban {
        Iban::compose(&self.country, &format!("{}{account_number}", self.bank_code))
    }
}

/// Random account numbers from the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomIbanGenerator {
    prefix: IbanPrefix,
}

impl RandomIbanGenerator {
    pub fn new(prefix: IbanPrefix) -> Self {
        Self { prefix }
    }
}

impl IbanGenerator for RandomIbanGenerator {
    fn generate(&self) -> Iban {
        let mut rng = rand::thread_rng();
        let number: String = (0..ACCOUNT_NUMBER_LEN)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        self.prefix.iban(&number)
    }
}

/// Deterministic generator: account numbers 1, 2, 3, …
#[derive(Debug)]
pub struct SequentialIbanGenerator {
    prefix: IbanPrefix,
    next: AtomicU64,
}

impl SequentialIbanGenerator {
    pub fn new(prefix: IbanPrefix) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }
}

impl IbanGenerator for SequentialIbanGenerator {
    fn generate(&self) -> Iban {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        self.prefix.iban(&format!("{n:0width$}", width = ACCOUNT_NUMBER_LEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix() -> IbanPrefix {
        IbanPrefix::new("RO", "TALY").unwrap()
    }

    #[test]
    fn known_iban_passes_checksum() {
        assert!(Iban::new("GB82WEST12345698765432").is_valid_checksum());
        assert!(!Iban::new("GB83WEST12345698765432").is_valid_checksum());
    }

    #[test]
    fn compose_produces_valid_check_digits() {
        let iban = Iban::compose("GB", "WEST12345698765432");
        assert_eq!(iban.as_str(), "GB82WEST12345698765432");
    }

    #[test]
    fn sequential_generator_is_deterministic_and_valid() {
        let g = SequentialIbanGenerator::new(prefix());
        let a = g.generate();
        let b = g.generate();

        assert!(a.as_str().starts_with("RO"));
        assert!(a.as_str().ends_with("TALY0000000000000001"));
        assert_ne!(a, b);
        assert!(a.is_valid_checksum() && b.is_valid_checksum());
    }

    #[test]
    fn random_generator_yields_valid_ibans() {
        let g = RandomIbanGenerator::new(prefix());
        for _ in 0..50 {
            let iban = g.generate();
            assert_eq!(iban.as_str().len(), 24);
            assert!(iban.is_valid_checksum(), "{iban}");
        }
    }

    #[test]
    fn rejects_malformed_prefix() {
        assert!(IbanPrefix::new("ro", "TALY").is_err());
        assert!(IbanPrefix::new("RO", "TAL").is_err());
    }
}
