mod form;

pub use form::{FormMode, UserForm, UserFormErrors};

use contracts::domain::common::EntityId;
use contracts::system::users::{Role, UserPayload};
use leptos::prelude::*;
use thaw::*;

use crate::shared::icons::icon;

/// Create/edit dialog. The parent performs the request and reports back
/// through `saving` and `server_error`.
#[component]
pub fn UserFormModal(
    mode: FormMode,
    initial: UserForm,
    #[prop(into)] roles: Signal<Vec<Role>>,
    #[prop(into)] saving: Signal<bool>,
    #[prop(into)] server_error: Signal<Option<String>>,
    on_close: Callback<()>,
    on_submit: Callback<UserPayload>,
) -> impl IntoView {
    let username = RwSignal::new(initial.username.clone());
    let full_name = RwSignal::new(initial.full_name.clone());
    let email = RwSignal::new(initial.email.clone());
    let password = RwSignal::new(String::new());
    let role_id = RwSignal::new(initial.role_id);
    let errors = RwSignal::new(UserFormErrors::default());

    let title = match mode {
        FormMode::Create => "Новый пользователь".to_string(),
        FormMode::Edit(_) => format!("Редактирование: {}", initial.username),
    };
    let password_hint = match mode {
        FormMode::Create => "Пароль",
        FormMode::Edit(_) => "Новый пароль (пусто — не менять)",
    };

    let on_save = move |_| {
        let form = UserForm {
            username: username.get_untracked(),
            full_name: full_name.get_untracked(),
            email: email.get_untracked(),
            role_id: role_id.get_untracked(),
            password: password.get_untracked(),
        };
        match form.submit(mode) {
            Ok(payload) => {
                errors.set(UserFormErrors::default());
                on_submit.run(payload);
            }
            Err(field_errors) => errors.set(field_errors),
        }
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| on_close.run(())
                    >
                        {icon("x")}
                    </Button>
                </div>

                <div class="modal-body">
                    {move || server_error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                    <div class="form__group">
                        <Label>"Логин"</Label>
                        <Input
                            value=username
                            disabled=Signal::derive(move || saving.get())
                        />
                        {move || errors.get().username.map(|e| view! { <div class="form__error">{e}</div> })}
                    </div>

                    <div class="form__group">
                        <Label>"ФИО"</Label>
                        <Input
                            value=full_name
                            disabled=Signal::derive(move || saving.get())
                        />
                    </div>

                    <div class="form__group">
                        <Label>"Email"</Label>
                        <Input
                            value=email
                            input_type=InputType::Email
                            disabled=Signal::derive(move || saving.get())
                        />
                        {move || errors.get().email.map(|e| view! { <div class="form__error">{e}</div> })}
                    </div>

                    <div class="form__group">
                        <Label>"Роль"</Label>
                        <select
                            class="form__select"
                            on:change=move |ev| {
                                role_id.set(event_target_value(&ev).parse::<EntityId>().ok());
                            }
                            disabled=move || saving.get()
                        >
                            <option value="" selected=move || role_id.get().is_none()>
                                "— выберите роль —"
                            </option>
                            {move || roles.get().into_iter().map(|role| {
                                let id = role.id;
                                view! {
                                    <option value=id.to_string() selected=move || role_id.get() == Some(id)>
                                        {role.name}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                        {move || errors.get().role.map(|e| view! { <div class="form__error">{e}</div> })}
                    </div>

                    <div class="form__group">
                        <Label>{password_hint}</Label>
                        <Input
                            value=password
                            input_type=InputType::Password
                            disabled=Signal::derive(move || saving.get())
                        />
                        {move || errors.get().password.map(|e| view! { <div class="form__error">{e}</div> })}
                    </div>
                </div>

                <div class="modal-footer">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| on_close.run(())
                        disabled=Signal::derive(move || saving.get())
                    >
                        "Отмена"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_save
                        disabled=Signal::derive(move || saving.get())
                    >
                        {move || if saving.get() { "Сохранение..." } else { "Сохранить" }}
                    </Button>
                </div>
            </div>
        </div>
    }
}
