//! Whitelisted donation currencies.
//!
//! Records carry a currency key as a plain string. Consumers look it up here
//! and fall back to [`DEFAULT_CURRENCY`] for anything outside the table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
  Wmatic,
  Weth,
  Usdc,
  Dai,
}

pub const DEFAULT_CURRENCY: Currency = Currency::Wmatic;

impl Currency {
  /// The whitelist key, which doubles as the ticker symbol.
  pub fn symbol(&self) -> &'static str { self.into() }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Wmatic => "Wrapped Matic",
      Self::Weth => "Wrapped Ether",
      Self::Usdc => "USD Coin",
      Self::Dai => "Dai Stablecoin",
    }
  }

  pub fn decimals(&self) -> u8 {
    match self {
      Self::Usdc => 6,
      _ => 18,
    }
  }

  /// Strict lookup by whitelist key.
  pub fn lookup(key: &str) -> Result<Self> {
    Self::from_str(key).map_err(|_| Error::UnknownCurrency(key.to_owned()))
  }

  /// Lenient lookup: unknown keys map to [`DEFAULT_CURRENCY`].
  pub fn or_default(key: &str) -> Self { Self::from_str(key).unwrap_or(DEFAULT_CURRENCY) }
}

/// Display symbol for a record's currency key.
pub fn currency_symbol(key: &str) -> &'static str { Currency::or_default(key).symbol() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_keys_resolve() {
    assert_eq!(Currency::lookup("USDC").unwrap(), Currency::Usdc);
    assert_eq!(Currency::Usdc.decimals(), 6);
    assert_eq!(currency_symbol("WETH"), "WETH");
  }

  #[test]
  fn unknown_key_falls_back_to_default_symbol() {
    assert_eq!(currency_symbol("DOGE"), "WMATIC");
    assert_eq!(currency_symbol(""), "WMATIC");
    assert!(matches!(
      Currency::lookup("DOGE"),
      Err(Error::UnknownCurrency(k)) if k == "DOGE"
    ));
  }
}
