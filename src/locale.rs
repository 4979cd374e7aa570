// Locale-aware display helpers: prices, Arabic-Indic digits and translated short dates

use std::fmt::Display;

const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Arabic list-separator comma used between the weekday and the date.
pub const ARABIC_COMMA: char = '،';

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

const MONTH_KEYS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    Prefix,
    Suffix,
}

// Number conventions for a locale family
#[derive(Debug, Clone, Copy)]
struct LocaleRules {
    group: char,
    decimal: char,
    position: SymbolPosition,
    arabic_digits: bool,
}

impl LocaleRules {
    fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "de" | "es" | "it" | "nl" => Self {
                group: '.',
                decimal: ',',
                position: SymbolPosition::Suffix,
                arabic_digits: false,
            },
            "fr" => Self {
                group: NARROW_NBSP,
                decimal: ',',
                position: SymbolPosition::Suffix,
                arabic_digits: false,
            },
            "ar" => Self {
                group: '٬',
                decimal: '٫',
                position: SymbolPosition::Suffix,
                arabic_digits: true,
            },
            // en and anything unrecognised
            _ => Self {
                group: ',',
                decimal: '.',
                position: SymbolPosition::Prefix,
                arabic_digits: false,
            },
        }
    }
}

fn minor_units(currency: &str) -> u32 {
    match currency {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "PYG" | "XAF" | "XOF" => 0,
        "BHD" | "KWD" | "JOD" | "OMR" | "TND" | "IQD" | "LYD" => 3,
        _ => 2,
    }
}

fn currency_symbol(currency: &str, locale: &str) -> Option<&'static str> {
    let us = locale.eq_ignore_ascii_case("en-US") || locale.eq_ignore_ascii_case("en");
    let symbol = match currency {
        "USD" if us || !locale.starts_with("en") => "$",
        "USD" => "US$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "NGN" => "₦",
        "PHP" => "₱",
        "VND" => "₫",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "CNY" => "CN¥",
        _ => return None,
    };
    Some(symbol)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

// Rounds |amount| half away from zero on its shortest decimal form, so 1.005 gives 1.01.
// Returns the whole and fraction digits.
fn round_decimal(amount: f64, fraction_digits: usize) -> (String, String) {
    let text = amount.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(fraction_digits))
        .map(|b| b - b'0')
        .collect();

    let round_up = fraction
        .as_bytes()
        .get(fraction_digits)
        .is_some_and(|d| *d >= b'5');
    if round_up {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - fraction_digits;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    (render(&digits[..split]), render(&digits[split..]))
}

// Body of the price without sign or symbol, plus whether it rounded to zero
fn format_amount(amount: f64, fraction_digits: u32, rules: &LocaleRules) -> (String, bool) {
    if amount.is_nan() {
        return ("NaN".to_string(), false);
    }
    if amount.is_infinite() {
        return ("∞".to_string(), false);
    }

    let (whole, fraction) = round_decimal(amount, fraction_digits as usize);
    let is_zero = whole.bytes().chain(fraction.bytes()).all(|b| b == b'0');

    let mut body = group_digits(&whole, rules.group);
    if !fraction.is_empty() {
        body.push(rules.decimal);
        body.push_str(&fraction);
    }

    if rules.arabic_digits {
        body = to_arabic_numerals(&body);
    }
    (body, is_zero)
}

/// Formats `amount` as money, e.g. `$1,234.56` for USD in en-US or `1.234,56 €` for EUR in de-DE.
///
/// Unknown locales use en-US conventions and unknown currency codes are printed as the code.
pub fn format_price(amount: f64, currency: &str, locale: &str) -> String {
    let currency = currency.to_ascii_uppercase();
    let rules = LocaleRules::for_locale(locale);
    let (body, is_zero) = format_amount(amount, minor_units(&currency), &rules);

    // no "-$0.00"
    let negative = amount.is_sign_negative() && !amount.is_nan() && !is_zero;
    let sign = if negative { "-" } else { "" };

    match (currency_symbol(&currency, locale), rules.position) {
        (Some(symbol), SymbolPosition::Prefix) => format!("{sign}{symbol}{body}"),
        (None, SymbolPosition::Prefix) => format!("{sign}{currency}{NBSP}{body}"),
        (Some(symbol), SymbolPosition::Suffix) => format!("{sign}{body}{NBSP}{symbol}"),
        (None, SymbolPosition::Suffix) => format!("{sign}{body}{NBSP}{currency}"),
    }
}

pub fn format_price_usd(amount: f64) -> String {
    format_price(amount, "USD", "en-US")
}

pub fn to_arabic_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => ARABIC_DIGITS[(c as u8 - b'0') as usize],
            _ => c,
        })
        .collect()
}

pub fn format_number<T: Display>(value: T, is_arabic: bool) -> String {
    let text = value.to_string();
    if is_arabic {
        to_arabic_numerals(&text)
    } else {
        text
    }
}

fn month_key(token: &str) -> String {
    let lower = token.to_lowercase();
    MONTH_KEYS
        .iter()
        .find(|key| lower.len() >= 3 && key.starts_with(lower.as_str()))
        .map(|key| key.to_string())
        .unwrap_or(lower)
}

/// Translates a short English date such as `Wed, 14 May` into `{day}، {digits} {month}`.
///
/// `translate` gets lowercase keys (`wed`, `may`, `january`, ...) and returns `None` on a
/// miss, in which case the English token is kept. Anything not shaped like
/// `{Day}, {date} {Month}` comes back unchanged.
pub fn format_localized_date<F>(english_date: &str, is_arabic: bool, translate: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !is_arabic {
        return english_date.to_string();
    }

    let parts: Vec<&str> = english_date.split(',').collect();
    let [day_name, rest] = parts.as_slice() else {
        return english_date.to_string();
    };

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let [day_of_month, month] = tokens.as_slice() else {
        return english_date.to_string();
    };

    let day_name = day_name.trim();
    let translated_day =
        translate(day_name.to_lowercase().as_str()).unwrap_or_else(|| day_name.to_string());
    let translated_month =
        translate(month_key(month).as_str()).unwrap_or_else(|| month.to_string());

    format!(
        "{translated_day}{ARABIC_COMMA} {} {translated_month}",
        to_arabic_numerals(day_of_month)
    )
}
