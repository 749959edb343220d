//! Expenditure article and payment type lookups
//!
//! Article codes come out of spreadsheets mangled in two known ways: a
//! trailing period added to stop the cell being read as a number
//! ("59.01."), and a trailing zero lost when it was read as one ("59.4").

use super::catalog::CatalogSnapshot;
use crate::error::ImportError;
use crate::models::{Cell, ExpenditureArticle, PaymentType};

/// Canonical form of an article code as written in the catalog
pub fn normalize_article_code(raw: &str) -> String {
    let code = raw.trim().trim_end_matches('.').trim_end();

    // "59.4" means "59.40": a two-part code whose last group lost its zero
    if let Some((major, minor)) = code.split_once('.') {
        let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if digits(major) && minor.len() == 1 && digits(minor) {
            return format!("{}0", code);
        }
    }

    code.to_string()
}

/// Text of an article code cell; numeric cells are rendered without
/// floating-point noise
pub fn article_code_text(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => {
            let rounded = (n * 100.0).round() / 100.0;
            rounded.to_string()
        }
        other => other.text(),
    }
}

pub fn resolve_article<'c>(
    catalog: &'c CatalogSnapshot,
    cell: &Cell,
    row_index: usize,
) -> Result<&'c ExpenditureArticle, ImportError> {
    let code = normalize_article_code(&article_code_text(cell));
    catalog.articles.find_by_name(&code).ok_or_else(|| {
        ImportError::code_lookup(
            row_index,
            format!("unknown expenditure article code '{}'", code),
        )
    })
}

pub fn resolve_payment_type<'c>(
    catalog: &'c CatalogSnapshot,
    label: &str,
    row_index: usize,
) -> Result<&'c PaymentType, ImportError> {
    catalog.payment_types.find_ignoring_case(label).ok_or_else(|| {
        ImportError::code_lookup(
            row_index,
            format!("unknown payment type code '{}'", label.trim()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;
    use crate::import::catalog::fixtures;

    #[test]
    fn test_normalize_article_code() {
        assert_eq!(normalize_article_code("59.4"), "59.40");
        assert_eq!(normalize_article_code("20.02."), "20.02");
        assert_eq!(normalize_article_code(" 59.01. "), "59.01");
        assert_eq!(normalize_article_code("10.01.01"), "10.01.01");
        assert_eq!(normalize_article_code("59.40"), "59.40");
        assert_eq!(normalize_article_code("71"), "71");
        assert_eq!(normalize_article_code(""), "");
    }

    #[test]
    fn test_normalized_codes_resolve_to_canonical_entity() {
        let catalog = fixtures::catalog();
        let canonical = catalog.articles.find_by_name("59.40").unwrap();
        let from_text = resolve_article(&catalog, &Cell::Text("59.4".into()), 3).unwrap();
        let from_number = resolve_article(&catalog, &Cell::Number(59.4), 3).unwrap();
        assert_eq!(from_text.id, canonical.id);
        assert_eq!(from_number.id, canonical.id);

        let canonical = catalog.articles.find_by_name("20.02").unwrap();
        let resolved = resolve_article(&catalog, &Cell::Text("20.02.".into()), 3).unwrap();
        assert_eq!(resolved.id, canonical.id);
    }

    #[test]
    fn test_numeric_cell_noise_removed() {
        assert_eq!(article_code_text(&Cell::Number(20.019999999999996)), "20.02");
        assert_eq!(article_code_text(&Cell::Number(71.0)), "71");
    }

    #[test]
    fn test_unknown_article_code() {
        let catalog = fixtures::catalog();
        let err = resolve_article(&catalog, &Cell::Text("99.99".into()), 12).unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::CodeLookup);
        assert_eq!(
            err.to_string(),
            "Error reading row 12: unknown expenditure article code '99.99'"
        );
    }

    #[test]
    fn test_payment_types() {
        let catalog = fixtures::catalog();
        assert_eq!(resolve_payment_type(&catalog, "virament", 2).unwrap().name, "Virament");
        assert_eq!(
            resolve_payment_type(&catalog, "Avans numerar ", 2).unwrap().name,
            "Avans numerar"
        );
        let err = resolve_payment_type(&catalog, "card", 2).unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::CodeLookup);
        assert_eq!(err.message, "unknown payment type code 'card'");
    }
}
