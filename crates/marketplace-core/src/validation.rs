//! Input validation for sign-up, profiles, listings and alerts.

use std::fmt;

use serde_json::{Map, Value};

use crate::models::{ListingKind, Profile, Role};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Value too short.
    TooShort { field: String, min: usize, actual: usize },
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Required field absent.
    MissingField(String),
    /// Field present but of the wrong shape.
    InvalidField { field: String, reason: String },
    /// Unknown role name.
    InvalidRole(String),
    /// Body was expected to be a JSON object.
    NotAnObject(String),
    /// Email already belongs to an account.
    AlreadyRegistered(String),
    /// The caller's role may not perform the action.
    RoleNotPermitted { role: Role, action: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::TooShort { field, min, actual } => {
                write!(f, "{} is too short ({} chars, min {})", field, actual, min)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::MissingField(field) => write!(f, "{} is required", field),
            ValidationError::InvalidField { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            ValidationError::InvalidRole(role) => {
                write!(f, "Invalid role '{}' (expected farmer, buyer or renter)", role)
            }
            ValidationError::NotAnObject(what) => write!(f, "{} must be a JSON object", what),
            ValidationError::AlreadyRegistered(email) => {
                write!(f, "A user with email {} has already been registered", email)
            }
            ValidationError::RoleNotPermitted { role, action } => {
                write!(f, "Users with role {} cannot {}", role, action)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length accepted at sign-up.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum allowed length for a display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Listing keys owned by the server; client-supplied values are dropped.
const RESERVED_LISTING_KEYS: [&str; 4] = ["id", "userId", "createdAt", "updatedAt"];

/// Profile keys that cannot be changed through a profile update.
const RESERVED_PROFILE_KEYS: [&str; 3] = ["id", "email", "role"];

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one dot after @
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a sign-up password.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();

    if length == 0 {
        return Err(ValidationError::Empty("password".to_string()));
    }

    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
            actual: length,
        });
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LENGTH,
            actual: length,
        });
    }

    Ok(())
}

/// Split sign-up `userData` into the chosen role and the profile to store.
///
/// `userData` must be an object with a valid `role` and a non-empty `name`.
/// The role is kept on the user record, not inside the profile.
pub fn parse_signup_data(user_data: &Value) -> Result<(Role, Profile), ValidationError> {
    let Some(object) = user_data.as_object() else {
        return Err(ValidationError::NotAnObject("userData".to_string()));
    };

    let role = match object.get("role") {
        Some(Value::String(name)) => name.parse::<Role>()?,
        Some(other) => return Err(ValidationError::InvalidRole(other.to_string())),
        None => return Err(ValidationError::MissingField("role".to_string())),
    };

    let mut fields = object.clone();
    fields.remove("role");
    let profile = profile_from_fields(fields)?;

    let name = profile.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty("name".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual: name.chars().count(),
        });
    }

    Ok((role, profile))
}

/// Shallow-merge profile updates into an existing profile.
///
/// Keys that identify the account (`id`, `email`, `role`) are ignored.
pub fn merge_profile_updates(profile: &Profile, updates: &Value) -> Result<Profile, ValidationError> {
    let Some(updates) = updates.as_object() else {
        return Err(ValidationError::NotAnObject("profile update".to_string()));
    };

    let mut fields = match serde_json::to_value(profile) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    };

    for (key, value) in updates {
        if RESERVED_PROFILE_KEYS.contains(&key.as_str()) {
            continue;
        }
        fields.insert(key.clone(), value.clone());
    }

    let merged = profile_from_fields(fields)?;
    if merged.name.trim().is_empty() {
        return Err(ValidationError::Empty("name".to_string()));
    }

    Ok(merged)
}

fn profile_from_fields(fields: Map<String, Value>) -> Result<Profile, ValidationError> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| ValidationError::InvalidField {
        field: "profile".to_string(),
        reason: err.to_string(),
    })
}

/// Validate listing input and return the fields to store.
///
/// Every required field of the kind must be a non-empty string or a number.
/// Server-owned keys (`id`, `userId`, timestamps) are stripped.
pub fn validate_listing(kind: ListingKind, data: &Value) -> Result<Map<String, Value>, ValidationError> {
    let Some(object) = data.as_object() else {
        return Err(ValidationError::NotAnObject(format!("{} listing", kind.namespace())));
    };

    for field in kind.required_fields() {
        match object.get(*field) {
            None | Some(Value::Null) => {
                return Err(ValidationError::MissingField(field.to_string()));
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(ValidationError::Empty(field.to_string()));
            }
            Some(Value::String(_)) | Some(Value::Number(_)) => {}
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    field: field.to_string(),
                    reason: "must be a string or a number".to_string(),
                });
            }
        }
    }

    let mut fields = object.clone();
    for key in RESERVED_LISTING_KEYS {
        fields.remove(key);
    }

    Ok(fields)
}

/// Require a non-empty, trimmed text field.
pub fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.in").is_ok());
        assert!(validate_email(" test@example.com ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_email("test.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@example@com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@localhost"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@example..com"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(matches!(validate_password(""), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_password("abc"),
            Err(ValidationError::TooShort { min: 6, actual: 3, .. })
        ));
    }

    #[test]
    fn test_parse_signup_data() {
        let (role, profile) = parse_signup_data(&json!({
            "role": "farmer",
            "name": "Rajesh Kumar",
            "location": "Coimbatore, TN",
            "phoneNumber": "+91 9876543210",
            "currentCultivation": "Tomatoes"
        }))
        .unwrap();

        assert_eq!(role, Role::Farmer);
        assert_eq!(profile.name, "Rajesh Kumar");
        assert_eq!(profile.phone_number, "+91 9876543210");
        assert!(!profile.extra.contains_key("role"));
        assert_eq!(profile.extra.get("currentCultivation"), Some(&json!("Tomatoes")));
    }

    #[test]
    fn test_parse_signup_data_rejects_bad_input() {
        assert!(matches!(
            parse_signup_data(&json!("farmer")),
            Err(ValidationError::NotAnObject(_))
        ));
        assert!(matches!(
            parse_signup_data(&json!({"name": "A"})),
            Err(ValidationError::MissingField(_))
        ));
        assert!(matches!(
            parse_signup_data(&json!({"role": "admin", "name": "A"})),
            Err(ValidationError::InvalidRole(_))
        ));
        assert!(matches!(
            parse_signup_data(&json!({"role": "buyer", "name": "  "})),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            parse_signup_data(&json!({"role": "buyer", "name": 42})),
            Err(ValidationError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_merge_profile_updates() {
        let profile = Profile {
            name: "Priya".to_string(),
            location: "Salem, TN".to_string(),
            ..Profile::default()
        };

        let merged = merge_profile_updates(
            &profile,
            &json!({"location": "Erode, TN", "role": "buyer", "photo": "p.png"}),
        )
        .unwrap();

        assert_eq!(merged.name, "Priya");
        assert_eq!(merged.location, "Erode, TN");
        assert_eq!(merged.extra.get("photo"), Some(&json!("p.png")));
        assert!(!merged.extra.contains_key("role"));

        assert!(matches!(
            merge_profile_updates(&profile, &json!([1, 2])),
            Err(ValidationError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_validate_listing() {
        let fields = validate_listing(
            ListingKind::Post,
            &json!({
                "id": "forged",
                "userId": "someone-else",
                "cropName": "Tomatoes",
                "quantity": "500 kg",
                "price": 25,
                "description": "Fresh"
            }),
        )
        .unwrap();

        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("userId"));
        assert_eq!(fields.get("price"), Some(&json!(25)));
    }

    #[test]
    fn test_validate_listing_missing_fields() {
        assert!(matches!(
            validate_listing(ListingKind::Tool, &json!({"name": "Tractor", "description": "50HP"})),
            Err(ValidationError::MissingField(field)) if field == "dailyRate"
        ));
        assert!(matches!(
            validate_listing(
                ListingKind::Seed,
                &json!({"name": "Paddy", "variety": "", "description": "d", "pricePerKg": "45"})
            ),
            Err(ValidationError::Empty(field)) if field == "variety"
        ));
        assert!(matches!(
            validate_listing(ListingKind::Post, &json!(null)),
            Err(ValidationError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::RoleNotPermitted {
            role: Role::Buyer,
            action: "create tools listings".to_string(),
        };
        assert_eq!(err.to_string(), "Users with role buyer cannot create tools listings");

        let err = ValidationError::MissingField("cropName".to_string());
        assert_eq!(err.to_string(), "cropName is required");
    }
}
