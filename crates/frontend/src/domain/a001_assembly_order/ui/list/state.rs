use contracts::domain::a001_assembly_order::AssemblyOrder;
use contracts::domain::common::EntityId;
use contracts::enums::{OrderPriority, OrderStatus};
use leptos::prelude::*;

use crate::domain::a001_assembly_order::api::AssemblyOrdersGateway;
use crate::shared::list_view::{Choice, InFlight, ListFilter, ListViewState};
use crate::shared::notifications::NotificationSink;
use crate::shared::state_cell::StateCell;
use crate::shared::ui_error::UiError;

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

impl ListFilter for AssemblyOrder {
    type Status = OrderStatus;
    type Category = OrderPriority;

    fn status(&self) -> OrderStatus {
        self.status
    }

    fn category(&self) -> Option<OrderPriority> {
        Some(self.priority)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.order_number.as_str(),
            self.customer.as_str(),
            self.product.as_str(),
        ];
        fields.extend(self.technician.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderOp {
    AdvanceStatus,
}

#[derive(Debug, Clone)]
pub struct AssemblyQueueState {
    pub list: ListViewState<AssemblyOrder>,
    pub loading: bool,
    pub is_loaded: bool,
    pub error: Option<String>,
    pub in_flight: InFlight<OrderOp>,
}

impl Default for AssemblyQueueState {
    fn default() -> Self {
        Self {
            list: ListViewState::new(Choice::All, DEFAULT_PAGE_SIZE),
            loading: false,
            is_loaded: false,
            error: None,
            in_flight: InFlight::default(),
        }
    }
}

impl AssemblyQueueState {
    /// Orders per status over the whole source, in workflow order.
    pub fn status_counts(&self) -> Vec<(OrderStatus, usize)> {
        OrderStatus::all()
            .into_iter()
            .map(|status| {
                let count = self
                    .list
                    .source()
                    .iter()
                    .filter(|o| o.status == status)
                    .count();
                (status, count)
            })
            .collect()
    }
}

pub fn create_state() -> RwSignal<AssemblyQueueState> {
    RwSignal::new(AssemblyQueueState::default())
}

pub async fn load_queue<G, C, N>(gateway: &G, state: &C, notify: &N)
where
    G: AssemblyOrdersGateway + ?Sized,
    C: StateCell<AssemblyQueueState>,
    N: NotificationSink,
{
    let started = state.update_with(|s| {
        s.loading = true;
        s.error = None;
    });
    if started.is_none() {
        return;
    }

    match gateway.list().await {
        Ok(orders) => {
            log::debug!("loaded {} assembly orders", orders.len());
            state.update_with(|s| {
                s.list.set_source(orders);
                s.loading = false;
                s.is_loaded = true;
            });
        }
        Err(e) => {
            let err = UiError::load("Не удалось загрузить очередь сборки", e);
            log::error!("{}", err);
            state.update_with(|s| {
                s.error = Some(err.to_string());
                s.loading = false;
            });
            notify.error(err.to_string());
        }
    }
}

/// Move an order one step forward in the workflow and patch the response
/// into the source.
pub async fn advance_status<G, C, N>(gateway: &G, state: &C, notify: &N, id: EntityId)
where
    G: AssemblyOrdersGateway + ?Sized,
    C: StateCell<AssemblyQueueState>,
    N: NotificationSink,
{
    let next = state.update_with(|s| {
        let next = s.list.find(id).and_then(|o| o.status.next())?;
        s.in_flight
            .try_begin(id, OrderOp::AdvanceStatus)
            .then_some(next)
    });
    let Some(Some(next)) = next else {
        return;
    };

    match gateway.update_status(id, next).await {
        Ok(order) => {
            log::debug!("order {} moved to {}", id, order.status.code());
            let message = format!(
                "Заказ {}: {}",
                order.order_number,
                order.status.display_name()
            );
            state.update_with(|s| {
                s.list.replace(order);
                s.in_flight.finish(id, OrderOp::AdvanceStatus);
            });
            notify.success(message);
        }
        Err(e) => {
            let err = UiError::mutation("Не удалось изменить статус заказа", e);
            log::warn!("{}", err);
            state.update_with(|s| s.in_flight.finish(id, OrderOp::AdvanceStatus));
            notify.error(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_assembly_order::api::fakes::{order, FakeOrders};
    use crate::shared::notifications::testing::RecordingSink;
    use crate::shared::notifications::NoticeLevel;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn queue() -> Vec<AssemblyOrder> {
        let mut orders = vec![
            order(1, "ENS-001", OrderStatus::Pending),
            order(2, "ENS-002", OrderStatus::InProgress),
            order(3, "ENS-003", OrderStatus::InTesting),
            order(4, "ENS-004", OrderStatus::Completed),
            order(5, "ENS-005", OrderStatus::Delivered),
        ];
        orders[1].technician = Some("Marta".into());
        orders[2].priority = OrderPriority::High;
        orders
    }

    fn loaded() -> (FakeOrders, Rc<RefCell<AssemblyQueueState>>, RecordingSink) {
        let gateway = FakeOrders::with(queue());
        let state = Rc::new(RefCell::new(AssemblyQueueState::default()));
        let sink = RecordingSink::default();
        block_on(load_queue(&gateway, &state, &sink));
        (gateway, state, sink)
    }

    #[test]
    fn test_load_and_counts() {
        let (_, state, _) = loaded();
        let s = state.borrow();
        assert!(s.is_loaded);
        assert_eq!(s.list.filtered_count(), 5);
        assert!(s.status_counts().iter().all(|(_, n)| *n == 1));
    }

    #[test]
    fn test_load_failure() {
        let gateway = FakeOrders::default();
        gateway.set_failing(true);
        let state = Rc::new(RefCell::new(AssemblyQueueState::default()));
        let sink = RecordingSink::default();

        block_on(load_queue(&gateway, &state, &sink));

        let s = state.borrow();
        assert!(s.error.is_some());
        assert!(!s.loading);
        assert_eq!(sink.levels(), vec![NoticeLevel::Error]);
    }

    #[test]
    fn test_status_priority_and_search_filters() {
        let (_, state, _) = loaded();
        let mut s = state.borrow_mut();
        s.list.set_status_filter(Choice::Only(OrderStatus::InProgress));
        assert_eq!(s.list.filtered()[0].id, 2);

        s.list.set_status_filter(Choice::All);
        s.list.set_search_term("marta");
        assert_eq!(s.list.filtered_count(), 1);

        s.list.set_search_term("ens-00");
        s.list.set_category_filter(Choice::Only(OrderPriority::High));
        assert_eq!(s.list.filtered()[0].id, 3);
    }

    #[test]
    fn test_advance_status_patches_one_order() {
        let (gateway, state, sink) = loaded();
        let before: Vec<AssemblyOrder> = state.borrow().list.source().to_vec();

        block_on(advance_status(&gateway, &state, &sink, 1));

        let s = state.borrow();
        assert_eq!(s.list.find(1).unwrap().status, OrderStatus::InProgress);
        for (old, new) in before.iter().zip(s.list.source()).skip(1) {
            assert_eq!(old, new);
        }
        assert!(s.in_flight.is_empty());
        assert_eq!(sink.levels(), vec![NoticeLevel::Success]);
        assert!(!gateway.calls.borrow().iter().skip(1).any(|c| c == "list"));
    }

    #[test]
    fn test_delivered_order_cannot_advance() {
        let (gateway, state, sink) = loaded();
        let calls = gateway.calls.borrow().len();

        block_on(advance_status(&gateway, &state, &sink, 5));

        assert_eq!(gateway.calls.borrow().len(), calls);
        assert!(sink.notices.borrow().is_empty());
    }

    #[test]
    fn test_advance_failure_keeps_status() {
        let (gateway, state, sink) = loaded();
        gateway.set_failing(true);

        block_on(advance_status(&gateway, &state, &sink, 3));

        let s = state.borrow();
        assert_eq!(s.list.find(3).unwrap().status, OrderStatus::InTesting);
        assert!(!s.in_flight.is_pending(3, OrderOp::AdvanceStatus));
        assert_eq!(sink.levels(), vec![NoticeLevel::Error]);
    }
}
