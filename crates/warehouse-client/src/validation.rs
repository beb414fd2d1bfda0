//! Form Validation
//!
//! Raw form input in, request bodies out. Anything rejected here never reaches
//! the network.

use crate::error::ValidationError;
use crate::models::{Item, ItemDraft, LoginRequest, RegisterRequest, Role};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub role: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let username = self.username.trim();
        let role = self.role.trim();
        if username.is_empty() || self.password.is_empty() || role.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort { min: MIN_USERNAME_LEN });
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
        }
        if self.password != self.password_confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        let role: Role = role.parse().map_err(ValidationError::InvalidRole)?;

        Ok(RegisterRequest {
            username: username.to_string(),
            password: self.password.clone(),
            role,
        })
    }
}

/// Item editor fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
}

impl ItemForm {
    /// Pre-fill for editing an existing item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description_text().unwrap_or_default().to_string(),
            quantity: item.quantity.to_string(),
            price: item.price.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ItemDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyItemName);
        }

        let quantity: i64 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidQuantity)?;
        if quantity < 0 {
            return Err(ValidationError::InvalidQuantity);
        }

        // Accept a decimal comma, which number inputs in some locales produce.
        let price: f64 = self
            .price
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| ValidationError::InvalidPrice)?;
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::InvalidPrice);
        }

        Ok(ItemDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            quantity,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form(username: &str, password: &str, confirm: &str, role: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let form = LoginForm { username: "   ".into(), password: "secret".into() };
        assert_eq!(form.validate(), Err(ValidationError::MissingCredentials));

        let form = LoginForm { username: " alice ".into(), password: "secret".into() };
        assert_eq!(form.validate().unwrap().username, "alice");
    }

    #[test]
    fn test_register_rules_in_order() {
        assert_eq!(
            register_form("", "secret1", "secret1", "viewer").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            register_form("al", "secret1", "secret1", "viewer").validate(),
            Err(ValidationError::UsernameTooShort { min: 3 })
        );
        assert_eq!(
            register_form("alice", "12345", "12345", "viewer").validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            register_form("alice", "secret1", "secret2", "viewer").validate(),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            register_form("alice", "secret1", "secret1", "owner").validate(),
            Err(ValidationError::InvalidRole("owner".into()))
        );

        let request = register_form("alice", "secret1", "secret1", "manager").validate().unwrap();
        assert_eq!(request.role, Role::Manager);
    }

    #[test]
    fn test_item_form_parsing() {
        let form = ItemForm {
            name: "  Widget ".into(),
            description: "".into(),
            quantity: "4".into(),
            price: "10,5".into(),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.quantity, 4);
        assert_eq!(draft.price, 10.5);
    }

    #[test]
    fn test_item_form_rejects_bad_numbers() {
        let base = ItemForm {
            name: "Widget".into(),
            description: String::new(),
            quantity: "1".into(),
            price: "1".into(),
        };

        let form = ItemForm { quantity: "-1".into(), ..base.clone() };
        assert_eq!(form.validate(), Err(ValidationError::InvalidQuantity));

        let form = ItemForm { quantity: "1.5".into(), ..base.clone() };
        assert_eq!(form.validate(), Err(ValidationError::InvalidQuantity));

        let form = ItemForm { price: "-0.01".into(), ..base.clone() };
        assert_eq!(form.validate(), Err(ValidationError::InvalidPrice));

        let form = ItemForm { price: "NaN".into(), ..base.clone() };
        assert_eq!(form.validate(), Err(ValidationError::InvalidPrice));

        let form = ItemForm { name: " ".into(), ..base };
        assert_eq!(form.validate(), Err(ValidationError::EmptyItemName));
    }
}
