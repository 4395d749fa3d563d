use contracts::domain::common::EntityId;
use contracts::system::users::{User, UserPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// Editable copy of a user, as typed in the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role_id: Option<EntityId>,
    pub password: String,
}

/// Field-level validation messages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFormErrors {
    pub username: Option<&'static str>,
    pub email: Option<&'static str>,
    pub role: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl UserFormErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.password.is_none()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl UserForm {
    /// The password field always starts blank.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            role_id: Some(user.role_id),
            password: String::new(),
        }
    }

    pub fn validate(&self, mode: FormMode) -> UserFormErrors {
        let mut errors = UserFormErrors::default();
        if self.username.trim().is_empty() {
            errors.username = Some("Логин обязателен");
        }
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.email = Some("Некорректный email");
        }
        if self.role_id.is_none() {
            errors.role = Some("Выберите роль");
        }
        if mode == FormMode::Create && self.password.trim().is_empty() {
            errors.password = Some("Пароль обязателен");
        }
        errors
    }

    /// Build the request body. A blank password becomes `None` and is left
    /// out of the JSON entirely.
    pub fn submit(&self, mode: FormMode) -> Result<UserPayload, UserFormErrors> {
        let errors = self.validate(mode);
        let Some(role_id) = self.role_id.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };
        Ok(UserPayload {
            username: self.username.trim().to_string(),
            full_name: non_blank(&self.full_name),
            email: non_blank(&self.email),
            role_id,
            password: non_blank(&self.password),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> UserForm {
        UserForm {
            username: "  ana ".into(),
            full_name: "Ana Pérez".into(),
            email: "".into(),
            role_id: Some(2),
            password: "   ".into(),
        }
    }

    #[test]
    fn test_edit_with_blank_password() {
        let payload = filled().submit(FormMode::Edit(5)).unwrap();
        assert_eq!(payload.username, "ana");
        assert_eq!(payload.email, None);
        assert_eq!(payload.password, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_create_requires_password() {
        let errors = filled().submit(FormMode::Create).unwrap_err();
        assert_eq!(errors.password, Some("Пароль обязателен"));
        assert!(errors.username.is_none());
    }

    #[test]
    fn test_required_fields() {
        let form = UserForm {
            email: "not-an-email".into(),
            ..UserForm::default()
        };
        let errors = form.validate(FormMode::Edit(1));
        assert!(errors.username.is_some());
        assert!(errors.role.is_some());
        assert!(errors.email.is_some());
        assert!(errors.password.is_none());
    }

    #[test]
    fn test_from_user_blanks_password() {
        let user = User {
            id: 3,
            username: "bob".into(),
            full_name: None,
            email: Some("bob@shop.test".into()),
            role_id: 1,
            role_name: None,
            deleted: false,
        };
        let form = UserForm::from_user(&user);
        assert_eq!(form.password, "");
        assert_eq!(form.role_id, Some(1));
        assert_eq!(form.full_name, "");
    }
}
