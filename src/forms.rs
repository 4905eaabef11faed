//! Form schemas with the field constraints enforced before any network call

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::PriceType;

/// Sign-in form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Sign-up form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,

    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
}

/// Ad creation form.
///
/// The price stays a string here because that is what the form carries; it
/// is validated as numeric and parsed only when the record is assembled.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdForm {
    #[validate(length(min = 10, message = "Title must be at least 10 characters"))]
    pub title: String,

    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,

    #[validate(custom = "numeric_price")]
    pub price: Option<String>,

    pub price_type: PriceType,

    pub category_id: Uuid,

    pub location_id: Uuid,

    pub contact_phone: Option<String>,

    #[validate(email(message = "Please enter a valid email address"))]
    pub contact_email: Option<String>,
}

impl AdForm {
    /// The price as a number, once validation has passed
    pub fn parsed_price(&self) -> Option<f64> {
        self.price.as_deref().and_then(|price| price.parse().ok())
    }
}

fn numeric_price(price: &str) -> Result<(), ValidationError> {
    let parsed: f64 = price.parse().map_err(|_| invalid_price())?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(invalid_price());
    }
    Ok(())
}

fn invalid_price() -> ValidationError {
    let mut error = ValidationError::new("price");
    error.message = Some("Price must be a positive number".into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad_form() -> AdForm {
        AdForm {
            title: "Selling my old bicycle".to_string(),
            description: "A well maintained bicycle".to_string(),
            price: Some("1500".to_string()),
            price_type: PriceType::Fixed,
            category_id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            contact_phone: None,
            contact_email: None,
        }
    }

    #[test]
    fn accepts_a_complete_ad_form() {
        assert!(ad_form().validate().is_ok());
    }

    #[test]
    fn description_boundary_is_twenty_characters() {
        let mut form = ad_form();
        form.description = "a".repeat(19);
        assert!(form.validate().is_err());

        form.description = "a".repeat(20);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn title_boundary_is_ten_characters() {
        let mut form = ad_form();
        form.title = "a".repeat(9);
        assert!(form.validate().is_err());

        form.title = "a".repeat(10);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn price_must_be_numeric_when_present() {
        let mut form = ad_form();
        form.price = Some("cheap".to_string());
        assert!(form.validate().is_err());

        form.price = Some("-5".to_string());
        assert!(form.validate().is_err());

        form.price = None;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn contact_email_is_checked_only_when_present() {
        let mut form = ad_form();
        form.contact_email = Some("not-an-email".to_string());
        assert!(form.validate().is_err());

        form.contact_email = Some("seller@example.com".to_string());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn parsed_price_reads_the_validated_string() {
        assert_eq!(ad_form().parsed_price(), Some(1500.0));

        let mut form = ad_form();
        form.price = None;
        assert_eq!(form.parsed_price(), None);
    }

    #[test]
    fn sign_up_passwords_must_match() {
        let form = SignUpForm {
            email: "user@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
            full_name: "Asha Menon".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn sign_in_rejects_short_passwords_and_bad_emails() {
        let form = SignInForm {
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
        };
        let errors = form.validate().expect_err("invalid form");
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
