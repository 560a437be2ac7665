use std::sync::OnceLock;

use email_address::EmailAddress;
use regex::Regex;

use crate::error::AppError;

pub const PHONE_REGEX_STRING: &str = r"^[+0-9()./ -]{6,20}$";

static PHONE_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

pub fn is_valid_phone(phone: &str) -> bool {
    match PHONE_REGEX.get_or_init(|| Regex::new(PHONE_REGEX_STRING)) {
        Ok(regex) => regex.is_match(phone),
        Err(e) => {
            tracing::error!("phone pattern does not compile: {}", e);
            false
        }
    }
}

/// Trimmed value of a mandatory text field.
pub fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

pub fn email(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if !EmailAddress::is_valid(value) {
        return Err(AppError::bad_request("Invalid email address"));
    }
    Ok(value.to_owned())
}

pub fn phone(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if !is_valid_phone(value) {
        return Err(AppError::bad_request("Invalid phone number"));
    }
    Ok(value.to_owned())
}

/// `None` for absent or blank optional text.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("+41 79 123 45 67"));
        assert!(is_valid_phone("079.123.45.67"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me maybe"));
        assert!(!is_valid_phone("+1 555 123 4567 ext 89"));
    }

    #[test]
    fn text_fields() {
        assert_eq!(required("customer_name", "  Jane ").unwrap(), "Jane");
        assert_eq!(
            required("customer_name", "   ").unwrap_err().to_string(),
            "customer_name is required"
        );
        assert!(email("jane.smith@example.com").is_ok());
        assert!(email("jane.smith").is_err());
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" bring a photo ".into())), Some("bring a photo".into()));
    }
}
