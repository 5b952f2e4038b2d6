//! # Validation Module
//!
//! Input validation for the product form and search box.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Product form (caller)                                        │
//! │  ├── THIS MODULE: text → typed values, business rules                  │
//! │  └── Name non-empty, quantity/price non-negative, length limits        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Product Store                                                │
//! │  └── Shape only: price representable, id present on update            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (quantity >= 0, price_cents >= 0)                           │
//! │  └── PRIMARY KEY on id                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_price, parse_quantity, validate_product_name};
//!
//! validate_product_name("Widget").unwrap();
//! assert_eq!(parse_quantity("5").unwrap(), 5);
//! assert_eq!(parse_price("2.50").unwrap().cents(), 250);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum search query length, in characters.
pub const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a category label. Any non-blank label is accepted so the
/// catalog stays extensible.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::required("category"));
    }
    Ok(())
}

/// Validates an optional description.
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(d) if d.trim().chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            })
        }
        _ => Ok(()),
    }
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query string. Empty is allowed and means "everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
///
/// ## Example
/// ```rust
/// use stockroom_core::money::Money;
/// use stockroom_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Parses the price field of the form.
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let price = Money::parse(input)?;
    validate_price(price)?;
    Ok(price)
}

/// Parses the quantity field of the form.
pub fn parse_quantity(input: &str) -> ValidationResult<u32> {
    parse_count("quantity", input)
}

/// Parses the low-stock threshold field of the form.
pub fn parse_threshold(input: &str) -> ValidationResult<u32> {
    parse_count("low_stock_threshold", input)
}

fn parse_count(field: &str, input: &str) -> ValidationResult<u32> {
    let text = input.trim();

    if text.is_empty() {
        return Err(ValidationError::required(field));
    }

    if text.starts_with('-') && text.len() > 1 && text[1..].chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(field, "must be a whole number"));
    }

    text.parse::<u32>().map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

// =============================================================================
// Whole-form Validation
// =============================================================================

/// Runs every form rule over a creation payload.
///
/// The store does not call this; it belongs to the form that builds the
/// payload.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price(product.price)?;
    validate_description(product.description.as_deref())?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
