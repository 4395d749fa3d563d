mod workflow;

pub use workflow::{parse_hours, parse_order_id, OrderWorkflow, WorkflowPhase};

use contracts::domain::a001_assembly_order::OrderComponent;
use contracts::domain::common::EntityId;
use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_assembly_order::api::HttpAssemblyOrdersGateway;
use crate::shared::api_utils::{ApiClient, ApiConfig};
use crate::shared::components::badge::{priority_variant, Badge, OrderStatusBadge};
use crate::shared::date_utils::{format_date, format_date_opt};
use crate::shared::icons::icon;
use crate::shared::notifications::{use_notifications, NotificationSink};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::ui_error::UiError;
use crate::shared::view_scope::ViewScope;
use workflow::{load_order, register_progress};

/// Экран сборки: чек-лист комплектующих, заметки, результаты тестов, часы.
#[component]
pub fn AssemblyProcessPage(
    /// Order chosen elsewhere (queue row). `None` shows the picker only.
    #[prop(into)]
    order_id: Signal<Option<EntityId>>,
) -> impl IntoView {
    let state = RwSignal::new(OrderWorkflow::default());
    let notifications = use_notifications();
    let client = ApiClient::new(use_context::<ApiConfig>().unwrap_or_else(ApiConfig::resolve));
    let gateway = StoredValue::new(HttpAssemblyOrdersGateway::new(client));
    let scope = StoredValue::new(ViewScope::attach());
    let lookup = RwSignal::new(String::new());

    let open = move |id: EntityId| {
        let gateway = gateway.get_value();
        scope.get_value().spawn(async move {
            load_order(&gateway, &state, &notifications, id).await;
        });
    };

    Effect::new(move |_| {
        if let Some(id) = order_id.get() {
            open(id);
        }
    });

    let open_lookup = move || match parse_order_id(&lookup.get_untracked()) {
        Some(id) => open(id),
        None => {
            let err = UiError::Validation("Введите ID заказа (целое число)".into());
            notifications.error(err.to_string());
        }
    };

    let submit = move |force_complete: bool| {
        let gateway = gateway.get_value();
        scope.get_value().spawn(async move {
            register_progress(&gateway, &state, &notifications, force_complete).await;
        });
    };

    let can_submit = Signal::derive(move || state.with(|w| w.can_submit()));
    let saving = Signal::derive(move || state.with(|w| w.is_saving()));
    let progress = Signal::derive(move || state.with(|w| w.progress_percent()));

    view! {
        <PageFrame page_id="a001_assembly_order--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {icon("wrench")}
                        {move || state.with(|w| match &w.order {
                            Some(o) => format!(" Сборка {}", o.order_number),
                            None => " Сборка".to_string(),
                        })}
                    </h1>
                    {move || state.with(|w| w.order.as_ref().map(|o| o.status)).map(|status| view! {
                        <OrderStatusBadge status=status />
                    })}
                </div>
                <div class="page__header-right">
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <div style="max-width: 160px;">
                            <Input value=lookup placeholder="ID заказа" />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| open_lookup()
                        >
                            "Открыть"
                        </Button>
                    </Flex>
                </div>
            </div>

            <div class="page__content">
                {move || state.with(|w| w.error.clone()).map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Show when=move || state.with(|w| w.is_loading())>
                    <div class="page__placeholder">"Загрузка заказа..."</div>
                </Show>

                <Show when=move || state.with(|w| w.phase == WorkflowPhase::Unloaded)>
                    <div class="page__placeholder">"Выберите заказ в очереди или введите его ID"</div>
                </Show>

                <Show when=move || state.with(|w| w.order.is_some())>
                    <div class="detail-grid">
                        <div class="detail-grid__item">
                            <Label>"Клиент"</Label>
                            <span>{move || state.with(|w| w.order.as_ref().map(|o| o.customer.clone()))}</span>
                        </div>
                        <div class="detail-grid__item">
                            <Label>"Изделие"</Label>
                            <span>{move || state.with(|w| w.order.as_ref().map(|o| o.product.clone()))}</span>
                        </div>
                        <div class="detail-grid__item">
                            <Label>"Приоритет"</Label>
                            {move || state.with(|w| w.order.as_ref().map(|o| o.priority)).map(|p| view! {
                                <Badge variant=priority_variant(p)>{p.display_name()}</Badge>
                            })}
                        </div>
                        <div class="detail-grid__item">
                            <Label>"Техник"</Label>
                            <span>{move || state.with(|w| {
                                w.order.as_ref().and_then(|o| o.technician.clone()).unwrap_or_else(|| "-".into())
                            })}</span>
                        </div>
                        <div class="detail-grid__item">
                            <Label>"Создан / выдача"</Label>
                            <span>{move || state.with(|w| w.order.as_ref().map(|o| format!(
                                "{} / {}",
                                format_date(&o.created_at),
                                format_date_opt(o.due_date.as_deref())
                            )))}</span>
                        </div>
                        <div class="detail-grid__item">
                            <Label>"Затрачено часов"</Label>
                            <span>{move || state.with(|w| w.order.as_ref().map(|o| format!("{:.2}", o.hours_spent)))}</span>
                        </div>
                    </div>

                    <div class="progress-bar progress-bar--large">
                        <div class="progress-bar__fill" style=move || format!("width: {}%;", progress.get())></div>
                    </div>
                    <span class="progress-bar__label">{move || format!("Готовность: {}%", progress.get())}</span>

                    <h2 class="page__subtitle">"Комплектующие"</h2>
                    <Show
                        when=move || state.with(|w| !w.checklist.is_empty())
                        fallback=|| view! { <div class="page__placeholder">"В заказе нет комплектующих"</div> }
                    >
                        <ul class="checklist">
                            <For
                                each=move || state.with(|w| w.checklist.clone())
                                key=|c: &OrderComponent| (c.id, c.installed)
                                children=move |c| {
                                    let id = c.id;
                                    view! {
                                        <li class="checklist__item">
                                            <label>
                                                <input
                                                    type="checkbox"
                                                    prop:checked=c.installed
                                                    disabled=move || saving.get()
                                                    on:change=move |_| state.update(|w| w.toggle_component(id))
                                                />
                                                " "
                                                {c.name.clone()}
                                                {c.kind.clone().map(|k| view! { <span class="checklist__kind">{format!(" ({})", k)}</span> })}
                                            </label>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>

                    <div class="form__group">
                        <Label>"Заметки"</Label>
                        <textarea
                            class="form__textarea"
                            rows="3"
                            prop:value=move || state.with(|w| w.notes.clone())
                            on:input=move |ev| state.update(|w| w.set_notes(event_target_value(&ev)))
                        ></textarea>
                    </div>

                    <div class="form__group">
                        <Label>"Результаты тестов"</Label>
                        <textarea
                            class="form__textarea"
                            rows="3"
                            prop:value=move || state.with(|w| w.test_results.clone())
                            on:input=move |ev| state.update(|w| w.set_test_results(event_target_value(&ev)))
                        ></textarea>
                    </div>

                    <div class="form__group">
                        <Label>"Часы за сессию"</Label>
                        <input
                            class="form__input"
                            type="text"
                            inputmode="decimal"
                            placeholder="0.0"
                            prop:value=move || state.with(|w| w.hours_input.clone())
                            on:input=move |ev| state.update(|w| w.set_hours(event_target_value(&ev)))
                        />
                        {move || state.with(|w| {
                            let raw = w.hours_input.trim();
                            (!raw.is_empty() && parse_hours(raw).is_none())
                                .then(|| view! { <div class="form__error">"Некорректное число часов, не будет отправлено"</div> })
                        })}
                    </div>

                    <Flex gap=FlexGap::Small>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| submit(false)
                            disabled=Signal::derive(move || !can_submit.get())
                        >
                            {move || if saving.get() { "Сохранение..." } else { "Зарегистрировать прогресс" }}
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| submit(true)
                            disabled=Signal::derive(move || !can_submit.get())
                        >
                            {icon("arrow-right")}
                            " Завершить"
                        </Button>
                    </Flex>
                </Show>
            </div>
        </PageFrame>
    }
}
