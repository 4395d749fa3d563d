use contracts::domain::common::EntityId;
use contracts::system::users::{Role, User, UserPayload};
use leptos::prelude::*;

use crate::shared::list_view::{Choice, InFlight, ListFilter, ListViewState, SoftDelete};
use crate::shared::notifications::NotificationSink;
use crate::shared::state_cell::StateCell;
use crate::shared::ui_error::UiError;
use crate::system::users::api::{RolesGateway, UsersGateway};

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            UserStatus::Active => "Активные",
            UserStatus::Inactive => "Неактивные",
        }
    }
}

impl ListFilter for User {
    type Status = UserStatus;
    type Category = EntityId;

    fn status(&self) -> UserStatus {
        if self.deleted {
            UserStatus::Inactive
        } else {
            UserStatus::Active
        }
    }

    fn category(&self) -> Option<EntityId> {
        Some(self.role_id)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.username.as_str()];
        fields.extend(self.full_name.as_deref());
        fields.extend(self.email.as_deref());
        fields
    }
}

impl SoftDelete for User {
    fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }
}

/// Mutations tracked per user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserOp {
    Update,
    Delete,
    Reactivate,
}

#[derive(Debug, Clone)]
pub struct UsersListState {
    pub list: ListViewState<User>,
    pub roles: Vec<Role>,
    pub loading: bool,
    pub is_loaded: bool,
    pub error: Option<String>,
    pub in_flight: InFlight<UserOp>,
    pub creating: bool,
}

impl Default for UsersListState {
    fn default() -> Self {
        Self {
            list: ListViewState::new(Choice::Only(UserStatus::Active), DEFAULT_PAGE_SIZE),
            roles: Vec::new(),
            loading: false,
            is_loaded: false,
            error: None,
            in_flight: InFlight::default(),
            creating: false,
        }
    }
}

impl UsersListState {
    pub fn role_name(&self, role_id: EntityId) -> Option<&str> {
        self.roles
            .iter()
            .find(|r| r.id == role_id)
            .map(|r| r.name.as_str())
    }

    /// Fill the display role name from the loaded roles.
    fn resolve_role(&self, mut user: User) -> User {
        if let Some(name) = self.role_name(user.role_id) {
            user.role_name = Some(name.to_string());
        }
        user
    }

    pub fn active_count(&self) -> usize {
        self.list.source().iter().filter(|u| !u.deleted).count()
    }
}

pub fn create_state() -> RwSignal<UsersListState> {
    RwSignal::new(UsersListState::default())
}

/// Fetch users and roles together; the screen stays in loading state until
/// both have answered.
pub async fn load_users<U, R, C, N>(users: &U, roles: &R, state: &C, notify: &N)
where
    U: UsersGateway + ?Sized,
    R: RolesGateway + ?Sized,
    C: StateCell<UsersListState>,
    N: NotificationSink,
{
    let started = state.update_with(|s| {
        s.loading = true;
        s.error = None;
    });
    if started.is_none() {
        return;
    }

    let (users_result, roles_result) = futures::future::join(users.list(), roles.list()).await;

    match (users_result, roles_result) {
        (Ok(users), Ok(roles)) => {
            log::debug!("loaded {} users, {} roles", users.len(), roles.len());
            state.update_with(|s| {
                s.roles = roles;
                let users = users.into_iter().map(|u| s.resolve_role(u)).collect();
                s.list.set_source(users);
                s.loading = false;
                s.is_loaded = true;
            });
        }
        (Err(e), _) | (_, Err(e)) => {
            let err = UiError::load("Не удалось загрузить пользователей", e);
            log::error!("{}", err);
            state.update_with(|s| {
                s.error = Some(err.to_string());
                s.loading = false;
            });
            notify.error(err.to_string());
        }
    }
}

/// Create a user and append the response to the source.
///
/// `Err` carries the inline form error.
pub async fn create_user<U, C, N>(
    gateway: &U,
    state: &C,
    notify: &N,
    payload: UserPayload,
) -> Result<(), String>
where
    U: UsersGateway + ?Sized,
    C: StateCell<UsersListState>,
    N: NotificationSink,
{
    let started = state.update_with(|s| !std::mem::replace(&mut s.creating, true));
    if started != Some(true) {
        return Err("Создание уже выполняется".to_string());
    }

    match gateway.create(&payload).await {
        Ok(user) => {
            log::debug!("user {} created", user.id);
            let username = user.username.clone();
            state.update_with(|s| {
                let user = s.resolve_role(user);
                s.list.append(user);
                s.creating = false;
            });
            notify.success(format!("Пользователь {} создан", username));
            Ok(())
        }
        Err(e) => {
            let err = UiError::mutation("Не удалось создать пользователя", e);
            log::warn!("{}", err);
            state.update_with(|s| s.creating = false);
            notify.error(err.to_string());
            Err(err.to_string())
        }
    }
}

/// Update a user and patch it in place.
pub async fn update_user<U, C, N>(
    gateway: &U,
    state: &C,
    notify: &N,
    id: EntityId,
    payload: UserPayload,
) -> Result<(), String>
where
    U: UsersGateway + ?Sized,
    C: StateCell<UsersListState>,
    N: NotificationSink,
{
    let started = state.update_with(|s| s.in_flight.try_begin(id, UserOp::Update));
    if started != Some(true) {
        return Err("Сохранение уже выполняется".to_string());
    }

    match gateway.update(id, &payload).await {
        Ok(response) => {
            log::debug!("user {} updated", id);
            state.update_with(|s| {
                match response {
                    Some(user) => {
                        let user = s.resolve_role(user);
                        s.list.replace(user);
                    }
                    None => {
                        let role_name = s.role_name(payload.role_id).map(str::to_string);
                        s.list.patch(id, |user| {
                            user.apply_payload(&payload);
                            user.role_name = role_name;
                        });
                    }
                }
                s.in_flight.finish(id, UserOp::Update);
            });
            notify.success("Изменения сохранены");
            Ok(())
        }
        Err(e) => {
            let err = UiError::mutation("Не удалось сохранить пользователя", e);
            log::warn!("{}", err);
            state.update_with(|s| s.in_flight.finish(id, UserOp::Update));
            notify.error(err.to_string());
            Err(err.to_string())
        }
    }
}

/// Soft delete: the user stays in the source with `deleted = true`.
pub async fn delete_user<U, C, N>(gateway: &U, state: &C, notify: &N, id: EntityId)
where
    U: UsersGateway + ?Sized,
    C: StateCell<UsersListState>,
    N: NotificationSink,
{
    if state.update_with(|s| s.in_flight.try_begin(id, UserOp::Delete)) != Some(true) {
        return;
    }

    match gateway.delete(id).await {
        Ok(()) => {
            state.update_with(|s| {
                s.list.soft_delete(id);
                s.in_flight.finish(id, UserOp::Delete);
            });
            notify.success("Пользователь деактивирован");
        }
        Err(e) => {
            let err = UiError::mutation("Не удалось деактивировать пользователя", e);
            log::warn!("{}", err);
            state.update_with(|s| s.in_flight.finish(id, UserOp::Delete));
            notify.error(err.to_string());
        }
    }
}

pub async fn reactivate_user<U, C, N>(gateway: &U, state: &C, notify: &N, id: EntityId)
where
    U: UsersGateway + ?Sized,
    C: StateCell<UsersListState>,
    N: NotificationSink,
{
    if state.update_with(|s| s.in_flight.try_begin(id, UserOp::Reactivate)) != Some(true) {
        return;
    }

    match gateway.reactivate(id).await {
        Ok(()) => {
            state.update_with(|s| {
                s.list.reactivate(id);
                s.in_flight.finish(id, UserOp::Reactivate);
            });
            notify.success("Пользователь восстановлен");
        }
        Err(e) => {
            let err = UiError::mutation("Не удалось восстановить пользователя", e);
            log::warn!("{}", err);
            state.update_with(|s| s.in_flight.finish(id, UserOp::Reactivate));
            notify.error(err.to_string());
        }
    }
}
