//! Common regex patterns for invoice identifier and amount extraction.
//!
//! All patterns are case-insensitive. The identifier patterns are listed in
//! the priority order used by [`default_identifier_patterns`].

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Bare code with invoice abbreviation: FAC-001, FAC123
    pub static ref FAC_CODE: Regex = Regex::new(
        r"(?i)FAC-?\d+"
    ).unwrap();

    // FACTURA N° 123, FACTURA 123
    pub static ref FACTURA_NUMERO: Regex = Regex::new(
        r"(?i)FACTURA\s*N[º°]?\s*\d+"
    ).unwrap();

    // FACT. 123, FACT 123
    pub static ref FACT_ABBREV: Regex = Regex::new(
        r"(?i)FACT\.?\s*\d+"
    ).unwrap();

    // N° FACTURA 123
    pub static ref NRO_FACTURA: Regex = Regex::new(
        r"(?i)N[º°]?\s*FACTURA\s*\d+"
    ).unwrap();

    // N° COMPROB. 123
    pub static ref NRO_COMPROBANTE: Regex = Regex::new(
        r"(?i)N[º°]?\s*COMPROB\.?\s*\d+"
    ).unwrap();

    // INVOICE 123
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)INVOICE\s*\d+"
    ).unwrap();

    // Free-text variants
    pub static ref FACTURA_NUMERO_TEXTO: Regex = Regex::new(
        r"(?i)Factura\s*n[úu]mero[:\s]*\d+"
    ).unwrap();

    pub static ref NRO_FACTURA_TEXTO: Regex = Regex::new(
        r"(?i)Nro\s*Factura[:\s]*[\w-]+"
    ).unwrap();

    pub static ref FACTURA_ID: Regex = Regex::new(
        r"(?i)Factura\s*ID[:\s]*\d+"
    ).unwrap();

    pub static ref COMPROBANTE: Regex = Regex::new(
        r"(?i)Comprobante\s*N[º°]?\s*[\w-]+"
    ).unwrap();

    // Amounts: currency marker, optional spaces, regional number (1.234,56)
    pub static ref AMOUNT_ARS: Regex = Regex::new(
        r"(?i)(?:\$|ARS)\s*([\d.,]+)"
    ).unwrap();

    pub static ref AMOUNT_USD: Regex = Regex::new(
        r"(?i)(?:USD)\s*([\d.,]+)"
    ).unwrap();
}

/// Identifier patterns in priority order, paired with their rule names.
pub fn default_identifier_patterns() -> Vec<(&'static str, &'static Regex)> {
    vec![
        ("fac_code", &*FAC_CODE),
        ("factura_numero", &*FACTURA_NUMERO),
        ("fact_abbrev", &*FACT_ABBREV),
        ("nro_factura", &*NRO_FACTURA),
        ("nro_comprobante", &*NRO_COMPROBANTE),
        ("invoice", &*INVOICE_NUMBER),
        ("factura_numero_texto", &*FACTURA_NUMERO_TEXTO),
        ("nro_factura_texto", &*NRO_FACTURA_TEXTO),
        ("factura_id", &*FACTURA_ID),
        ("comprobante", &*COMPROBANTE),
    ]
}

/// Amount patterns for the built-in currencies, in column order.
pub fn default_amount_patterns() -> Vec<(&'static str, &'static Regex)> {
    vec![("ARS", &*AMOUNT_ARS), ("USD", &*AMOUNT_USD)]
}

/// Build an amount pattern for arbitrary currency markers.
///
/// Markers are matched literally; `["$", "ARS"]` yields the same pattern as
/// [`AMOUNT_ARS`].
pub fn amount_pattern_for(markers: &[String]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = markers.iter().map(|m| regex::escape(m)).collect();
    Regex::new(&format!(r"(?i)(?:{})\s*([\d.,]+)", alternatives.join("|")))
}
