use contracts::enums::{OrderPriority, OrderStatus};
use leptos::prelude::*;

/// Badge component with different variants
#[component]
pub fn Badge(
    /// Badge variant: "primary", "success", "warning", "error", "neutral" (default)
    #[prop(optional)]
    variant: &'static str,
    /// Badge content
    children: Children,
) -> impl IntoView {
    let variant_class = match variant {
        "primary" => "badge--primary",
        "success" => "badge--success",
        "warning" => "badge--warning",
        "error" => "badge--error",
        _ => "badge--neutral",
    };

    view! {
        <span class=format!("badge {}", variant_class)>
            {children()}
        </span>
    }
}

pub fn status_variant(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "neutral",
        OrderStatus::InProgress => "primary",
        OrderStatus::InTesting => "warning",
        OrderStatus::Completed | OrderStatus::Delivered => "success",
    }
}

pub fn priority_variant(priority: OrderPriority) -> &'static str {
    match priority {
        OrderPriority::High => "error",
        OrderPriority::Medium => "warning",
        OrderPriority::Low => "neutral",
    }
}

/// Order status badge
#[component]
pub fn OrderStatusBadge(status: OrderStatus) -> impl IntoView {
    view! {
        <Badge variant=status_variant(status)>{status.display_name()}</Badge>
    }
}
