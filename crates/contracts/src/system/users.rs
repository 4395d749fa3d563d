use serde::{Deserialize, Serialize};

use crate::domain::common::{EntityId, Identified};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    #[serde(rename = "nombreUsuario")]
    pub username: String,
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "rolId")]
    pub role_id: EntityId,
    #[serde(rename = "rolNombre", default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    /// Soft-delete flag; a record without it is treated as active.
    #[serde(rename = "eliminado", default)]
    pub deleted: bool,
}

impl Identified for User {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl User {
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Apply the editable fields of a payload in place. Server-managed fields
    /// (`id`, `deleted`) are never touched.
    pub fn apply_payload(&mut self, payload: &UserPayload) {
        self.username = payload.username.clone();
        self.full_name = payload.full_name.clone();
        self.email = payload.email.clone();
        self.role_id = payload.role_id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

impl Identified for Role {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Тело запроса на создание/изменение пользователя.
///
/// `password` is omitted from the JSON body when `None`, so an update with a
/// blank password field never overwrites the stored credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(rename = "nombreUsuario")]
    pub username: String,
    #[serde(rename = "nombreCompleto")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "rolId")]
    pub role_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_without_deleted_flag_is_active() {
        let json = r#"{"id":7,"nombreUsuario":"ana","rolId":2}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.is_active());
        assert_eq!(user.full_name, None);
    }

    #[test]
    fn test_payload_without_password_has_no_password_key() {
        let payload = UserPayload {
            username: "ana".into(),
            full_name: Some("Ana Pérez".into()),
            email: None,
            role_id: 2,
            password: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert_eq!(obj["nombreUsuario"], "ana");
        assert_eq!(obj["rolId"], 2);
    }

    #[test]
    fn test_apply_payload_keeps_server_fields() {
        let mut user = User {
            id: 3,
            username: "old".into(),
            full_name: None,
            email: None,
            role_id: 1,
            role_name: Some("Admin".into()),
            deleted: true,
        };
        user.apply_payload(&UserPayload {
            username: "new".into(),
            full_name: Some("New Name".into()),
            email: Some("n@example.com".into()),
            role_id: 4,
            password: Some("secret".into()),
        });
        assert_eq!(user.id, 3);
        assert!(user.deleted);
        assert_eq!(user.username, "new");
        assert_eq!(user.role_id, 4);
    }
}
