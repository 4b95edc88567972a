//! The closed set of supported currencies and their upstream series

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Sek,
    Eur,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Sek, Currency::Eur, Currency::Usd];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Sek => "SEK",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    /// Series identifier used by the Riksbank cross rate API.
    pub fn series_id(&self) -> &'static str {
        match self {
            Currency::Sek => "SEKETT",
            Currency::Eur => "SEKEURPMI",
            Currency::Usd => "SEKUSDPMI",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SEK" => Ok(Currency::Sek),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            _ => Err(anyhow!("Unsupported currency: {}", s)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" Eur ".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("SEK".parse::<Currency>().unwrap(), Currency::Sek);
    }

    #[test]
    fn test_parse_unknown_currency() {
        let err = "GBP".parse::<Currency>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported currency: GBP");
    }

    #[test]
    fn test_series_ids() {
        assert_eq!(Currency::Sek.series_id(), "SEKETT");
        assert_eq!(Currency::Eur.series_id(), "SEKEURPMI");
        assert_eq!(Currency::Usd.series_id(), "SEKUSDPMI");
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&Currency::Usd).unwrap();
        assert_eq!(json, "\"USD\"");
        let parsed: Currency = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(parsed, Currency::Eur);
        assert!(serde_json::from_str::<Currency>("\"XYZ\"").is_err());
    }
}
