//! Static country and currency tables
//!
//! Country codes are ISO 3166-1 alpha-2, currency codes ISO 4217.

/// Currency used when a country is not in [`COUNTRY_CURRENCIES`]
pub const FALLBACK_CURRENCY: &str = "USD";

/// Country code to currency code
pub const COUNTRY_CURRENCIES: &[(&str, &str)] = &[
    ("AE", "AED"),
    ("AR", "ARS"),
    ("AT", "EUR"),
    ("AU", "AUD"),
    ("BA", "BAM"),
    ("BD", "BDT"),
    ("BE", "EUR"),
    ("BG", "BGN"),
    ("BO", "BOB"),
    ("BR", "BRL"),
    ("CA", "CAD"),
    ("CH", "CHF"),
    ("CL", "CLP"),
    ("CN", "CNY"),
    ("CO", "COP"),
    ("CR", "CRC"),
    ("CY", "EUR"),
    ("CZ", "CZK"),
    ("DE", "EUR"),
    ("DK", "DKK"),
    ("DO", "DOP"),
    ("DZ", "DZD"),
    ("EC", "USD"),
    ("EE", "EUR"),
    ("EG", "EGP"),
    ("ES", "EUR"),
    ("FI", "EUR"),
    ("FR", "EUR"),
    ("GB", "GBP"),
    ("GH", "GHS"),
    ("GR", "EUR"),
    ("GT", "GTQ"),
    ("HK", "HKD"),
    ("HR", "EUR"),
    ("HU", "HUF"),
    ("ID", "IDR"),
    ("IE", "EUR"),
    ("IL", "ILS"),
    ("IN", "INR"),
    ("IS", "ISK"),
    ("IT", "EUR"),
    ("JP", "JPY"),
    ("KE", "KES"),
    ("KR", "KRW"),
    ("KZ", "KZT"),
    ("LK", "LKR"),
    ("LT", "EUR"),
    ("LU", "EUR"),
    ("LV", "EUR"),
    ("MA", "MAD"),
    ("MT", "EUR"),
    ("MX", "MXN"),
    ("MY", "MYR"),
    ("NG", "NGN"),
    ("NL", "EUR"),
    ("NO", "NOK"),
    ("NZ", "NZD"),
    ("PA", "PAB"),
    ("PE", "PEN"),
    ("PH", "PHP"),
    ("PK", "PKR"),
    ("PL", "PLN"),
    ("PT", "EUR"),
    ("PY", "PYG"),
    ("QA", "QAR"),
    ("RO", "RON"),
    ("RS", "RSD"),
    ("RU", "RUB"),
    ("SA", "SAR"),
    ("SE", "SEK"),
    ("SG", "SGD"),
    ("SI", "EUR"),
    ("SK", "EUR"),
    ("TH", "THB"),
    ("TN", "TND"),
    ("TR", "TRY"),
    ("TW", "TWD"),
    ("UA", "UAH"),
    ("US", "USD"),
    ("UY", "UYU"),
    ("VE", "VES"),
    ("VN", "VND"),
    ("ZA", "ZAR"),
];

/// Currency code to display symbol
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("AUD", "A$"),
    ("BRL", "R$"),
    ("CAD", "CA$"),
    ("CHF", "CHF"),
    ("CNY", "CN¥"),
    ("CZK", "Kč"),
    ("DKK", "kr."),
    ("EUR", "€"),
    ("GBP", "£"),
    ("HKD", "HK$"),
    ("HUF", "Ft"),
    ("ILS", "₪"),
    ("INR", "₹"),
    ("JPY", "¥"),
    ("KRW", "₩"),
    ("MXN", "MX$"),
    ("NOK", "kr"),
    ("NZD", "NZ$"),
    ("PHP", "₱"),
    ("PLN", "zł"),
    ("RUB", "₽"),
    ("SEK", "kr"),
    ("THB", "฿"),
    ("TRY", "₺"),
    ("TWD", "NT$"),
    ("UAH", "₴"),
    ("USD", "$"),
    ("VND", "₫"),
    ("ZAR", "R"),
];

/// Currencies that are shown without minor units
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["CLP", "ISK", "JPY", "KRW", "PYG", "VND"];

/// Look up the currency for a country code, falling back to USD
pub fn currency_code(country: &str) -> &'static str {
    let country = country.trim().to_uppercase();
    COUNTRY_CURRENCIES
        .iter()
        .find(|(code, _)| *code == country)
        .map_or(FALLBACK_CURRENCY, |(_, currency)| *currency)
}

/// Display symbol for a currency code; unknown codes display as themselves
pub fn currency_symbol(currency_code: &str) -> String {
    let code = currency_code.trim().to_uppercase();
    CURRENCY_SYMBOLS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, symbol)| symbol.to_string())
}

/// Number of decimal places the currency is normally shown with
pub fn minor_digits(currency_code: &str) -> u32 {
    let code = currency_code.trim().to_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else {
        2
    }
}
