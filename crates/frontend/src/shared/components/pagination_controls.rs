use crate::shared::icons::icon;
use crate::shared::list_view::VisibleRange;
use leptos::prelude::*;

/// PaginationControls component - reusable pagination controls
///
/// Shows "start–end из N", prev/next buttons and the page size selector.
/// The selected page size is passed through as raw text; validation is up to
/// the list state.
#[component]
pub fn PaginationControls(
    /// Current page (0-indexed)
    #[prop(into)]
    current_page: Signal<usize>,

    /// Total number of pages (at least 1)
    #[prop(into)]
    page_count: Signal<usize>,

    /// Number of rows after filtering
    #[prop(into)]
    filtered_count: Signal<usize>,

    #[prop(into)]
    visible_range: Signal<VisibleRange>,

    #[prop(into)]
    can_go_back: Signal<bool>,

    #[prop(into)]
    can_go_forward: Signal<bool>,

    /// Current page size
    #[prop(into)]
    page_size: Signal<usize>,

    on_prev: Callback<()>,

    on_next: Callback<()>,

    /// Raw value of the page size selector
    on_page_size_change: Callback<String>,

    /// Available page size options
    page_size_options: Vec<usize>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <span class="pagination-info">
                {move || {
                    let range = visible_range.get();
                    if range.is_empty() {
                        "Нет записей".to_string()
                    } else {
                        format!("{}–{} из {}", range.start, range.end, filtered_count.get())
                    }
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_prev.run(())
                disabled=move || !can_go_back.get()
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {}", current_page.get() + 1, page_count.get().max(1))}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_next.run(())
                disabled=move || !can_go_forward.get()
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| on_page_size_change.run(event_target_value(&ev))
                prop:value=move || page_size.get().to_string()
            >
                {page_size_options.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
