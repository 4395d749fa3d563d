mod state;

pub use state::{AssemblyQueueState, OrderOp};

use contracts::domain::a001_assembly_order::AssemblyOrder;
use contracts::domain::common::EntityId;
use contracts::enums::{OrderPriority, OrderStatus};
use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_assembly_order::api::HttpAssemblyOrdersGateway;
use crate::shared::api_utils::{ApiClient, ApiConfig};
use crate::shared::components::badge::{priority_variant, Badge, OrderStatusBadge};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::date_utils::{format_date_opt, today};
use crate::shared::icons::icon;
use crate::shared::list_view::Choice;
use crate::shared::notifications::use_notifications;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::view_scope::ViewScope;
use state::{advance_status, create_state, load_queue, PAGE_SIZE_OPTIONS};

const TABLE_ID: &str = "a001-assembly-queue-table";

fn parse_status_filter(raw: &str) -> Choice<OrderStatus> {
    OrderStatus::from_code(raw).map_or(Choice::All, Choice::Only)
}

fn parse_priority_filter(raw: &str) -> Choice<OrderPriority> {
    OrderPriority::from_code(raw).map_or(Choice::All, Choice::Only)
}

fn row_key(order: &AssemblyOrder) -> (EntityId, OrderStatus, u8) {
    (order.id, order.status, order.progress)
}

/// Очередь сборочных заказов
#[component]
pub fn AssemblyQueuePage(
    /// Open the process screen for an order
    on_open: Callback<EntityId>,
) -> impl IntoView {
    let state = create_state();
    let notifications = use_notifications();
    let client = ApiClient::new(use_context::<ApiConfig>().unwrap_or_else(ApiConfig::resolve));
    let gateway = StoredValue::new(HttpAssemblyOrdersGateway::new(client));
    let scope = StoredValue::new(ViewScope::attach());
    let search_signal = RwSignal::new(String::new());

    let load_data = move || {
        let gateway = gateway.get_value();
        scope.get_value().spawn(async move {
            load_queue(&gateway, &state, &notifications).await;
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

    let on_advance = move |id: EntityId| {
        let gateway = gateway.get_value();
        scope.get_value().spawn(async move {
            advance_status(&gateway, &state, &notifications, id).await;
        });
    };

    let loading = Signal::derive(move || state.with(|s| s.loading));
    let status_value = move || match state.with(|s| s.list.status_filter()) {
        Choice::All => String::new(),
        Choice::Only(status) => status.code().to_string(),
    };

    view! {
        <PageFrame page_id="a001_assembly_order--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Очередь сборки"</h1>
                    <Badge>{move || state.with(|s| s.list.source().len().to_string())}</Badge>
                </div>
                <div class="page__header-right">
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

                <div class="status-summary">
                    {move || state.with(|s| s.status_counts()).into_iter().map(|(status, count)| view! {
                        <button
                            class="status-summary__item"
                            on:click=move |_| state.update(|s| s.list.set_status_filter(Choice::Only(status)))
                        >
                            <OrderStatusBadge status=status />
                            <span class="status-summary__count">{count}</span>
                        </button>
                    }).collect_view()}
                </div>

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
                                    placeholder="Номер, клиент, изделие, техник..."
                                />
                            </div>
                            <select
                                class="form__select"
                                on:change=move |ev| {
                                    let choice = parse_status_filter(&event_target_value(&ev));
                                    state.update(|s| s.list.set_status_filter(choice));
                                }
                                prop:value=status_value
                            >
                                <option value="">"Все статусы"</option>
                                {OrderStatus::all().into_iter().map(|status| view! {
                                    <option value=status.code()>{status.display_name()}</option>
                                }).collect_view()}
                            </select>
                            <select
                                class="form__select"
                                on:change=move |ev| {
                                    let choice = parse_priority_filter(&event_target_value(&ev));
                                    state.update(|s| s.list.set_category_filter(choice));
                                }
                            >
                                <option value="">"Любой приоритет"</option>
                                {OrderPriority::all().into_iter().map(|priority| view! {
                                    <option value=priority.code()>{priority.display_name()}</option>
                                }).collect_view()}
                            </select>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:id=TABLE_ID attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=110.0>"Номер"</TableHeaderCell>
                                <TableHeaderCell min_width=160.0>"Клиент"</TableHeaderCell>
                                <TableHeaderCell min_width=160.0>"Изделие"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Статус"</TableHeaderCell>
                                <TableHeaderCell min_width=90.0>"Приоритет"</TableHeaderCell>
                                <TableHeaderCell min_width=110.0>"Готовность"</TableHeaderCell>
                                <TableHeaderCell min_width=100.0>"Выдача"</TableHeaderCell>
                                <TableHeaderCell min_width=90.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || state.with(|s| s.list.page())
                                key=row_key
                                children=move |order| {
                                    let id = order.id;
                                    let next = order.status.next();
                                    let overdue = order.is_overdue(today());
                                    let advance_pending = Signal::derive(move || {
                                        state.with(|s| s.in_flight.is_pending(id, OrderOp::AdvanceStatus))
                                    });
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a href="#" on:click=move |ev| {
                                                        ev.prevent_default();
                                                        on_open.run(id);
                                                    }>
                                                        {order.order_number.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{order.customer.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{order.product.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <OrderStatusBadge status=order.status />
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <Badge variant=priority_variant(order.priority)>
                                                        {order.priority.display_name()}
                                                    </Badge>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <div class="progress-bar">
                                                        <div
                                                            class="progress-bar__fill"
                                                            style=format!("width: {}%;", order.progress)
                                                        ></div>
                                                    </div>
                                                    <span class="progress-bar__label">{format!("{}%", order.progress)}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class={if overdue { "text--error" } else { "" }}>
                                                        {format_date_opt(order.due_date.as_deref())}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| on_open.run(id)
                                                    attr:title="Сборка"
                                                >
                                                    {icon("wrench")}
                                                </Button>
                                                {next.map(|next| view! {
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| on_advance(id)
                                                        disabled=advance_pending
                                                        attr:title=format!("Перевести: {}", next.display_name())
                                                    >
                                                        {icon("arrow-right")}
                                                    </Button>
                                                })}
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </PageFrame>
    }
}
