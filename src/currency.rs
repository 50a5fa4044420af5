//! Currency selection seeded from a country code, and display symbols

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Used whenever no better currency can be chosen
pub const BASE_CURRENCY: &str = "USD";

const COUNTRY_CURRENCIES: &[(&str, &str)] = &[
    ("US", "USD"),
    ("AU", "AUD"),
    ("AZ", "AZN"),
    ("BR", "BRL"),
    ("GB", "GBP"),
    ("CA", "CAD"),
    ("CN", "CNY"),
    ("DK", "DKK"),
    ("IL", "ILS"),
    ("IN", "INR"),
    ("MX", "MXN"),
    ("NZ", "NZD"),
    ("NO", "NOK"),
    ("PL", "PLN"),
    ("RU", "RUB"),
    ("ZA", "ZAR"),
    ("SE", "SEK"),
    ("CH", "CHF"),
    ("TR", "TRY"),
    ("ES", "EUR"),
    ("DE", "EUR"),
    ("FR", "EUR"),
    ("IT", "EUR"),
    ("NL", "EUR"),
    ("BE", "EUR"),
    ("AT", "EUR"),
    ("IE", "EUR"),
    ("PT", "EUR"),
    ("FI", "EUR"),
    ("GR", "EUR"),
    ("LU", "EUR"),
];

const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "US$"),
    ("AUD", "AU$"),
    ("AZN", "₼"),
    ("BRL", "R$"),
    ("CAD", "CA$"),
    ("CNY", "元"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("ILS", "₪"),
    ("INR", "₹"),
    ("MXN", "MX$"),
    ("NZD", "NZ$"),
    ("NOK", "kr"),
    ("PLN", "zł"),
    ("RUB", "₽"),
    ("ZAR", "R"),
    ("SEK", "kr"),
    ("CHF", "CHF"),
    ("DKK", "kr"),
    ("TRY", "₺"),
];

/// Currencies offered by the selector when the configuration does not narrow them
pub fn default_offered() -> Vec<String> {
    CURRENCY_SYMBOLS
        .iter()
        .map(|(code, _)| (*code).to_string())
        .collect()
}

/// Currency mapped to a country code, if the table has one
pub fn country_currency(country: &str) -> Option<&'static str> {
    let country = country.trim().to_ascii_uppercase();
    COUNTRY_CURRENCIES
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, currency)| *currency)
}

/// Pick the initial currency for a detected country.
///
/// Falls back to [`BASE_CURRENCY`] when the country is unknown or its currency
/// is not among the offered ones.
pub fn currency_for_country(country: Option<&str>, offered: &[String]) -> String {
    country
        .and_then(country_currency)
        .filter(|currency| offered.iter().any(|o| o == currency))
        .unwrap_or(BASE_CURRENCY)
        .to_string()
}

/// Display symbol for each offered currency
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrencySymbols(BTreeMap<String, String>);

impl CurrencySymbols {
    pub fn from_offered(offered: &[String]) -> Self {
        let symbols = offered
            .iter()
            .filter_map(|code| {
                CURRENCY_SYMBOLS
                    .iter()
                    .find(|(known, _)| known == code)
                    .map(|(_, symbol)| (code.clone(), (*symbol).to_string()))
            })
            .collect();
        Self(symbols)
    }

    /// Symbol for a currency code, or the code itself when none is known
    pub fn symbol<'a>(&'a self, code: &'a str) -> &'a str {
        self.0.get(code).map(String::as_str).unwrap_or(code)
    }
}
