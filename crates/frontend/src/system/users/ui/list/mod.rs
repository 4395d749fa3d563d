mod state;

pub use state::{UserOp, UserStatus, UsersListState};

use contracts::domain::common::EntityId;
use contracts::system::users::{User, UserPayload};
use leptos::prelude::*;
use thaw::*;

use crate::shared::api_utils::{ApiClient, ApiConfig};
use crate::shared::components::badge::Badge;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::list_view::Choice;
use crate::shared::notifications::use_notifications;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::view_scope::ViewScope;
use crate::system::users::api::{HttpRolesGateway, HttpUsersGateway};
use crate::system::users::ui::details::{FormMode, UserForm, UserFormModal};
use state::{
    create_state, create_user, delete_user, load_users, reactivate_user, update_user,
    PAGE_SIZE_OPTIONS,
};

const TABLE_ID: &str = "sys-users-table";

fn status_filter_value(choice: Choice<UserStatus>) -> &'static str {
    match choice {
        Choice::All => "all",
        Choice::Only(UserStatus::Active) => "active",
        Choice::Only(UserStatus::Inactive) => "inactive",
    }
}

fn parse_status_filter(raw: &str) -> Choice<UserStatus> {
    match raw {
        "all" => Choice::All,
        "inactive" => Choice::Only(UserStatus::Inactive),
        _ => Choice::Only(UserStatus::Active),
    }
}

fn parse_role_filter(raw: &str) -> Choice<EntityId> {
    match raw.parse::<EntityId>() {
        Ok(id) => Choice::Only(id),
        Err(_) => Choice::All,
    }
}

/// Row key: changes whenever a visible field of the row changes
fn row_key(user: &User) -> (EntityId, bool, String, Option<String>, Option<String>, EntityId) {
    (
        user.id,
        user.deleted,
        user.username.clone(),
        user.full_name.clone(),
        user.email.clone(),
        user.role_id,
    )
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    let state = create_state();
    let notifications = use_notifications();
    let client = ApiClient::new(use_context::<ApiConfig>().unwrap_or_else(ApiConfig::resolve));
    let users_gw = StoredValue::new(HttpUsersGateway::new(client.clone()));
    let roles_gw = StoredValue::new(HttpRolesGateway::new(client));
    let scope = StoredValue::new(ViewScope::attach());

    let editing: RwSignal<Option<(FormMode, UserForm)>> = RwSignal::new(None);
    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);
    let search_signal = RwSignal::new(String::new());

    let load_data = move || {
        let users = users_gw.get_value();
        let roles = roles_gw.get_value();
        scope.get_value().spawn(async move {
            load_users(&users, &roles, &state, &notifications).await;
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded || s.loading) {
            load_data();
        }
    });

    Effect::new(move |_| {
        let term = search_signal.get();
        state.update(|s| {
            if s.list.search_term() != term {
                s.list.set_search_term(term);
            }
        });
    });

    let open_create = move || {
        form_error.set(None);
        editing.set(Some((FormMode::Create, UserForm::default())));
    };

    let open_edit = move |user: User| {
        form_error.set(None);
        editing.set(Some((FormMode::Edit(user.id), UserForm::from_user(&user))));
    };

    let submit = Callback::new(move |payload: UserPayload| {
        let Some((mode, _)) = editing.get_untracked() else {
            return;
        };
        saving.set(true);
        form_error.set(None);
        let gateway = users_gw.get_value();
        scope.get_value().spawn(async move {
            let result = match mode {
                FormMode::Create => create_user(&gateway, &state, &notifications, payload).await,
                FormMode::Edit(id) => {
                    update_user(&gateway, &state, &notifications, id, payload).await
                }
            };
            saving.set(false);
            match result {
                Ok(()) => editing.set(None),
                Err(e) => form_error.set(Some(e)),
            }
        });
    });

    let on_delete = move |id: EntityId| {
        let gateway = users_gw.get_value();
        scope.get_value().spawn(async move {
            delete_user(&gateway, &state, &notifications, id).await;
        });
    };

    let on_reactivate = move |id: EntityId| {
        let gateway = users_gw.get_value();
        scope.get_value().spawn(async move {
            reactivate_user(&gateway, &state, &notifications, id).await;
        });
    };

    let loading = Signal::derive(move || state.with(|s| s.loading));
    let roles = Signal::derive(move || state.with(|s| s.roles.clone()));

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Пользователи"</h1>
                    <Badge>
                        {move || state.with(|s| format!("{} / {}", s.active_count(), s.list.source().len()))}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| open_create()
                        disabled=loading
                    >
                        {icon("plus")}
                        " Новый"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=loading
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || state.with(|s| s.error.clone()).map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.with(|s| s.list.page_index()))
                                page_count=Signal::derive(move || state.with(|s| s.list.page_count()))
                                filtered_count=Signal::derive(move || state.with(|s| s.list.filtered_count()))
                                visible_range=Signal::derive(move || state.with(|s| s.list.visible_range()))
                                can_go_back=Signal::derive(move || state.with(|s| s.list.can_go_back()))
                                can_go_forward=Signal::derive(move || state.with(|s| s.list.can_go_forward()))
                                page_size=Signal::derive(move || state.with(|s| s.list.page_size()))
                                on_prev=Callback::new(move |_| state.update(|s| s.list.prev_page()))
                                on_next=Callback::new(move |_| state.update(|s| s.list.next_page()))
                                on_page_size_change=Callback::new(move |raw: String| {
                                    state.update(|s| {
                                        s.list.set_page_size_input(&raw);
                                    })
                                })
                                page_size_options=PAGE_SIZE_OPTIONS.to_vec()
                            />
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input
                                    value=search_signal
                                    placeholder="Логин, ФИО или Email..."
                                />
                            </div>
                            <select
                                class="form__select"
                                on:change=move |ev| {
                                    let choice = parse_status_filter(&event_target_value(&ev));
                                    state.update(|s| s.list.set_status_filter(choice));
                                }
                                prop:value=move || state.with(|s| status_filter_value(s.list.status_filter()))
                            >
                                <option value="active">{UserStatus::Active.display_name()}</option>
                                <option value="inactive">{UserStatus::Inactive.display_name()}</option>
                                <option value="all">"Все"</option>
                            </select>
                            <select
                                class="form__select"
                                on:change=move |ev| {
                                    let choice = parse_role_filter(&event_target_value(&ev));
                                    state.update(|s| s.list.set_category_filter(choice));
                                }
                            >
                                <option value="">"Все роли"</option>
                                {move || roles.get().into_iter().map(|role| view! {
                                    <option value=role.id.to_string()>{role.name}</option>
                                }).collect_view()}
                            </select>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| search_signal.set(String::new())
                            >
                                "Сбросить"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:id=TABLE_ID attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=140.0>"Логин"</TableHeaderCell>
                                <TableHeaderCell min_width=160.0>"ФИО"</TableHeaderCell>
                                <TableHeaderCell min_width=160.0>"Email"</TableHeaderCell>
                                <TableHeaderCell min_width=100.0>"Роль"</TableHeaderCell>
                                <TableHeaderCell min_width=90.0>"Статус"</TableHeaderCell>
                                <TableHeaderCell min_width=100.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || state.with(|s| s.list.page())
                                key=row_key
                                children=move |user| {
                                    let id = user.id;
                                    let deleted = user.deleted;
                                    let user_for_edit = user.clone();
                                    let delete_pending = Signal::derive(move || {
                                        state.with(|s| s.in_flight.is_pending(id, UserOp::Delete))
                                    });
                                    let reactivate_pending = Signal::derive(move || {
                                        state.with(|s| s.in_flight.is_pending(id, UserOp::Reactivate))
                                    });
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{user.username.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {user.full_name.clone().unwrap_or_default()}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {user.email.clone().unwrap_or_default()}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {user.role_name.clone().unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if deleted {
                                                        view! { <span class="badge badge--error">"Неактивен"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--success">"Активен"</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| open_edit(user_for_edit.clone())
                                                    attr:title="Редактировать"
                                                >
                                                    {icon("edit")}
                                                </Button>
                                                {if deleted {
                                                    view! {
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click=move |_| on_reactivate(id)
                                                            disabled=reactivate_pending
                                                            attr:title="Восстановить"
                                                        >
                                                            {icon("restore")}
                                                        </Button>
                                                    }.into_any()
                                                } else {
                                                    view! {
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click=move |_| on_delete(id)
                                                            disabled=delete_pending
                                                            attr:title="Деактивировать"
                                                        >
                                                            {icon("trash")}
                                                        </Button>
                                                    }.into_any()
                                                }}
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || editing.get().map(|(mode, form)| view! {
                    <UserFormModal
                        mode=mode
                        initial=form
                        roles=roles
                        saving=saving
                        server_error=form_error
                        on_close=Callback::new(move |_| editing.set(None))
                        on_submit=submit
                    />
                })}
            </div>
        </PageFrame>
    }
}
