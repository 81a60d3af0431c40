//! Asset and symbol primitives
//!
//! Token amounts are carried in minor units with a fixed decimal
//! precision per symbol, so all ledger arithmetic is integer-exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, Result};

/// Largest representable amount in minor units (2^62 - 1), leaving
/// headroom for intermediate sums.
pub const MAX_AMOUNT: u64 = (1 << 62) - 1;

/// Maximum decimal precision for a symbol
pub const MAX_PRECISION: u8 = 18;

/// Maximum symbol code length in characters
pub const MAX_SYMBOL_LEN: usize = 7;

/// Token identifier: 1-7 uppercase ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolCode(String);

impl SymbolCode {
    pub fn new(code: &str) -> Result<Self> {
        if code.is_empty()
            || code.len() > MAX_SYMBOL_LEN
            || !code.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(LedgerError::InvalidSymbol);
        }
        Ok(SymbolCode(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= MAX_SYMBOL_LEN
            && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SymbolCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        SymbolCode::new(s)
    }
}

/// Symbol code plus its fixed decimal precision.
///
/// Two symbols match only if both the code and the precision agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    code: SymbolCode,
    precision: u8,
}

impl Symbol {
    pub fn new(code: &str, precision: u8) -> Result<Self> {
        let code = SymbolCode::new(code)?;
        if precision > MAX_PRECISION {
            return Err(LedgerError::InvalidPrecision(precision));
        }
        Ok(Symbol { code, precision })
    }

    pub fn code(&self) -> &SymbolCode {
        &self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn is_valid(&self) -> bool {
        self.code.is_valid() && self.precision <= MAX_PRECISION
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// A quantity of one symbol, in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub amount: u64,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: u64, symbol: Symbol) -> Self {
        Asset { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Asset { amount: 0, symbol }
    }

    pub fn is_valid(&self) -> bool {
        self.amount <= MAX_AMOUNT && self.symbol.is_valid()
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset> {
        if self.symbol != other.symbol {
            return Err(LedgerError::SymbolMismatch);
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .filter(|sum| *sum <= MAX_AMOUNT)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset> {
        if self.symbol != other.symbol {
            return Err(LedgerError::SymbolMismatch);
        }
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision() as u32;
        if precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol);
        }
        let scale = 10u64.pow(precision);
        write!(
            f,
            "{}.{:0width$} {}",
            self.amount / scale,
            self.amount % scale,
            self.symbol,
            width = precision as usize
        )
    }
}

impl FromStr for Asset {
    type Err = LedgerError;

    /// Parses `"100.0000 ORE"`; the precision is inferred from the
    /// number of fractional digits.
    fn from_str(s: &str) -> Result<Self> {
        let (number, code) = s.split_once(' ').ok_or(LedgerError::InvalidAsset)?;
        let (int_part, frac_part) = match number.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (number, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidAsset);
        }
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidAsset);
        }

        let precision = frac_part.len() as u8;
        let symbol = Symbol::new(code, precision)?;
        let scale = 10u64
            .checked_pow(precision as u32)
            .ok_or(LedgerError::InvalidAsset)?;

        let int_units: u64 = int_part.parse().map_err(|_| LedgerError::InvalidAsset)?;
        let frac_units: u64 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| LedgerError::InvalidAsset)?
        };
        let amount = int_units
            .checked_mul(scale)
            .and_then(|units| units.checked_add(frac_units))
            .filter(|amount| *amount <= MAX_AMOUNT)
            .ok_or(LedgerError::InvalidAsset)?;

        Ok(Asset::new(amount, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_code_validation() {
        assert!(SymbolCode::new("ORE").is_ok());
        assert!(SymbolCode::new("ABCDEFG").is_ok());
        assert!(SymbolCode::new("").is_err());
        assert!(SymbolCode::new("ore").is_err());
        assert!(SymbolCode::new("TOOLONGX").is_err());
        assert!(SymbolCode::new("OR3").is_err());
    }

    #[test]
    fn test_symbol_precision_bounds() {
        assert!(Symbol::new("ORE", 0).is_ok());
        assert!(Symbol::new("ORE", 18).is_ok());
        assert!(Symbol::new("ORE", 19).is_err());
    }

    #[test]
    fn test_symbols_match_on_code_and_precision() {
        let a = Symbol::new("ORE", 4).unwrap();
        let b = Symbol::new("ORE", 4).unwrap();
        let c = Symbol::new("ORE", 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_asset_display() {
        let sym = Symbol::new("ORE", 4).unwrap();
        assert_eq!(Asset::new(1_000_000, sym.clone()).to_string(), "100.0000 ORE");
        assert_eq!(Asset::new(5, sym).to_string(), "0.0005 ORE");

        let whole = Symbol::new("BLK", 0).unwrap();
        assert_eq!(Asset::new(42, whole).to_string(), "42 BLK");
    }

    #[test]
    fn test_asset_parse() {
        let asset: Asset = "100.0000 ORE".parse().unwrap();
        assert_eq!(asset.amount, 1_000_000);
        assert_eq!(asset.symbol.precision(), 4);
        assert_eq!(asset.symbol.code().as_str(), "ORE");

        let whole: Asset = "42 BLK".parse().unwrap();
        assert_eq!(whole.amount, 42);
        assert_eq!(whole.symbol.precision(), 0);

        assert!("".parse::<Asset>().is_err());
        assert!("100".parse::<Asset>().is_err());
        assert!("1x0.00 ORE".parse::<Asset>().is_err());
        assert!("100.00 ore".parse::<Asset>().is_err());
    }

    #[test]
    fn test_asset_parse_display_round_trip() {
        for text in ["0.0001 ORE", "12.3400 TOK", "7 BLK"] {
            let asset: Asset = text.parse().unwrap();
            assert_eq!(asset.to_string(), text);
        }
    }

    #[test]
    fn test_checked_arithmetic() {
        let sym = Symbol::new("ORE", 4).unwrap();
        let a = Asset::new(100, sym.clone());
        let b = Asset::new(40, sym.clone());

        assert_eq!(a.checked_add(&b).unwrap().amount, 140);
        assert_eq!(a.checked_sub(&b).unwrap().amount, 60);
        assert!(b.checked_sub(&a).is_err());

        let other = Asset::new(1, Symbol::new("TOK", 4).unwrap());
        assert!(a.checked_add(&other).is_err());

        let near_cap = Asset::new(MAX_AMOUNT, sym.clone());
        assert!(near_cap.checked_add(&Asset::new(1, sym)).is_err());
    }

    #[test]
    fn test_asset_serialization() {
        let asset: Asset = "5.00 TOK".parse().unwrap();
        let json = serde_json::to_string(&asset).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, asset);
    }
}
