use async_trait::async_trait;
use contracts::domain::common::EntityId;
use contracts::system::users::{Role, User, UserPayload};

use crate::shared::api_utils::{ApiClient, ApiError};

const USERS_PATH: &str = "/api/users";
const ROLES_PATH: &str = "/api/roles";

/// Remote collection of users
#[async_trait(?Send)]
pub trait UsersGateway {
    async fn list(&self) -> Result<Vec<User>, ApiError>;

    async fn get_by_id(&self, id: EntityId) -> Result<User, ApiError>;

    /// Returns the created user with its server-assigned id
    async fn create(&self, payload: &UserPayload) -> Result<User, ApiError>;

    /// The API may answer with an empty body
    async fn update(&self, id: EntityId, payload: &UserPayload) -> Result<Option<User>, ApiError>;

    /// Soft delete
    async fn delete(&self, id: EntityId) -> Result<(), ApiError>;

    async fn reactivate(&self, id: EntityId) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
pub trait RolesGateway {
    async fn list(&self) -> Result<Vec<Role>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpUsersGateway {
    client: ApiClient,
}

impl HttpUsersGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl UsersGateway for HttpUsersGateway {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json(USERS_PATH).await
    }

    async fn get_by_id(&self, id: EntityId) -> Result<User, ApiError> {
        self.client.get_json(&format!("{}/{}", USERS_PATH, id)).await
    }

    async fn create(&self, payload: &UserPayload) -> Result<User, ApiError> {
        self.client
            .post_json::<_, User>(USERS_PATH, payload)
            .await?
            .ok_or_else(|| ApiError::Decode("пустой ответ на создание пользователя".into()))
    }

    async fn update(&self, id: EntityId, payload: &UserPayload) -> Result<Option<User>, ApiError> {
        self.client
            .put_json(&format!("{}/{}", USERS_PATH, id), payload)
            .await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", USERS_PATH, id)).await
    }

    async fn reactivate(&self, id: EntityId) -> Result<(), ApiError> {
        self.client
            .post_empty(&format!("{}/{}/reactivate", USERS_PATH, id))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct HttpRolesGateway {
    client: ApiClient,
}

impl HttpRolesGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl RolesGateway for HttpRolesGateway {
    async fn list(&self) -> Result<Vec<Role>, ApiError> {
        self.client.get_json(ROLES_PATH).await
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory gateways for view-model tests.

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct FakeUsers {
        pub users: Rc<RefCell<Vec<User>>>,
        pub fail: Rc<RefCell<bool>>,
        pub next_id: Rc<RefCell<EntityId>>,
        /// JSON bodies "sent" by create/update
        pub sent: Rc<RefCell<Vec<serde_json::Value>>>,
        pub calls: Rc<RefCell<Vec<String>>>,
    }

    impl FakeUsers {
        pub fn with(users: Vec<User>) -> Self {
            let fake = Self::default();
            *fake.next_id.borrow_mut() = 1000;
            *fake.users.borrow_mut() = users;
            fake
        }

        pub fn set_failing(&self, fail: bool) {
            *self.fail.borrow_mut() = fail;
        }

        fn check(&self, call: String) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(call);
            if *self.fail.borrow() {
                return Err(ApiError::Status {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl UsersGateway for FakeUsers {
        async fn list(&self) -> Result<Vec<User>, ApiError> {
            self.check("list".into())?;
            Ok(self.users.borrow().clone())
        }

        async fn get_by_id(&self, id: EntityId) -> Result<User, ApiError> {
            self.check(format!("get {id}"))?;
            self.users
                .borrow()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(ApiError::Status { status: 404, message: "not found".into() })
        }

        async fn create(&self, payload: &UserPayload) -> Result<User, ApiError> {
            self.sent.borrow_mut().push(serde_json::to_value(payload).unwrap());
            self.check("create".into())?;
            let id = {
                let mut next = self.next_id.borrow_mut();
                *next += 1;
                *next
            };
            // the server omits the flag, the client normalizes it
            let user = User {
                id,
                username: payload.username.clone(),
                full_name: payload.full_name.clone(),
                email: payload.email.clone(),
                role_id: payload.role_id,
                role_name: None,
                deleted: false,
            };
            self.users.borrow_mut().push(user.clone());
            Ok(user)
        }

        async fn update(&self, id: EntityId, payload: &UserPayload) -> Result<Option<User>, ApiError> {
            self.sent.borrow_mut().push(serde_json::to_value(payload).unwrap());
            self.check(format!("update {id}"))?;
            Ok(None)
        }

        async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
            self.check(format!("delete {id}"))
        }

        async fn reactivate(&self, id: EntityId) -> Result<(), ApiError> {
            self.check(format!("reactivate {id}"))
        }
    }

    #[derive(Clone, Default)]
    pub struct FakeRoles {
        pub roles: Vec<Role>,
        pub fail: bool,
    }

    #[async_trait(?Send)]
    impl RolesGateway for FakeRoles {
        async fn list(&self) -> Result<Vec<Role>, ApiError> {
            if self.fail {
                return Err(ApiError::Network("offline".into()));
            }
            Ok(self.roles.clone())
        }
    }
}
