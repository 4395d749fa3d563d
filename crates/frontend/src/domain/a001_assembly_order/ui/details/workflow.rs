use contracts::domain::a001_assembly_order::{
    completion_percent, AssemblyOrder, OrderComponent, ProgressPayload,
};
use contracts::domain::common::EntityId;
use contracts::enums::OrderStatus;

use crate::domain::a001_assembly_order::api::AssemblyOrdersGateway;
use crate::shared::notifications::NotificationSink;
use crate::shared::state_cell::StateCell;
use crate::shared::ui_error::UiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// Заказ не выбран
    Unloaded,
    Loading(EntityId),
    Loaded,
    Saving,
    LoadError,
}

/// Состояние экрана сборки одного заказа.
///
/// The checklist is a local copy of the order's components; it diverges from
/// the server copy until a progress registration returns.
#[derive(Debug, Clone)]
pub struct OrderWorkflow {
    pub phase: WorkflowPhase,
    pub order: Option<AssemblyOrder>,
    pub checklist: Vec<OrderComponent>,
    pub notes: String,
    pub test_results: String,
    /// Raw text of the hours field, per session
    pub hours_input: String,
    pub error: Option<String>,
}

impl Default for OrderWorkflow {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Unloaded,
            order: None,
            checklist: Vec::new(),
            notes: String::new(),
            test_results: String::new(),
            hours_input: String::new(),
            error: None,
        }
    }
}

/// Hours worked in this session: non-negative finite number, anything else is `None`.
pub fn parse_hours(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h >= 0.0)
}

/// Order id typed by the user, e.g. "12" or "#12".
pub fn parse_order_id(raw: &str) -> Option<EntityId> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    raw.parse::<EntityId>().ok().filter(|id| *id > 0)
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl OrderWorkflow {
    pub fn order_id(&self) -> Option<EntityId> {
        self.order.as_ref().map(|o| o.id)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, WorkflowPhase::Loading(_))
    }

    pub fn is_saving(&self) -> bool {
        self.phase == WorkflowPhase::Saving
    }

    /// Start loading `id`. Returns `false` when that order is already shown
    /// or already being fetched.
    pub fn begin_load(&mut self, id: EntityId) -> bool {
        match self.phase {
            WorkflowPhase::Loading(current) if current == id => return false,
            WorkflowPhase::Loaded | WorkflowPhase::Saving if self.order_id() == Some(id) => {
                return false
            }
            _ => {}
        }
        self.phase = WorkflowPhase::Loading(id);
        self.order = None;
        self.checklist.clear();
        self.error = None;
        true
    }

    /// Seed the editable fields from the server copy. Responses for an id
    /// that is no longer requested are dropped.
    pub fn finish_load(&mut self, order: AssemblyOrder) -> bool {
        if self.phase != WorkflowPhase::Loading(order.id) {
            log::debug!("stale order {} response ignored", order.id);
            return false;
        }
        self.seed(order);
        self.hours_input.clear();
        self.phase = WorkflowPhase::Loaded;
        true
    }

    pub fn fail_load(&mut self, id: EntityId, message: String) {
        if self.phase == WorkflowPhase::Loading(id) {
            self.phase = WorkflowPhase::LoadError;
            self.error = Some(message);
        }
    }

    fn seed(&mut self, order: AssemblyOrder) {
        self.checklist = order.components.clone();
        self.notes = order.notes.clone().unwrap_or_default();
        self.test_results = order.test_results.clone().unwrap_or_default();
        self.order = Some(order);
    }

    fn is_editable(&self) -> bool {
        matches!(self.phase, WorkflowPhase::Loaded | WorkflowPhase::Saving)
    }

    pub fn toggle_component(&mut self, component_id: EntityId) {
        if !self.is_editable() {
            return;
        }
        if let Some(item) = self.checklist.iter_mut().find(|c| c.id == component_id) {
            item.installed = !item.installed;
        }
    }

    pub fn set_notes(&mut self, notes: String) {
        if self.is_editable() {
            self.notes = notes;
        }
    }

    pub fn set_test_results(&mut self, results: String) {
        if self.is_editable() {
            self.test_results = results;
        }
    }

    pub fn set_hours(&mut self, raw: String) {
        if self.is_editable() {
            self.hours_input = raw;
        }
    }

    pub fn installed_count(&self) -> usize {
        self.checklist.iter().filter(|c| c.installed).count()
    }

    /// Live percentage from the checklist; falls back to the last saved
    /// server value for orders without components.
    pub fn progress_percent(&self) -> u8 {
        completion_percent(self.installed_count(), self.checklist.len())
            .or_else(|| self.order.as_ref().map(|o| o.progress))
            .unwrap_or(0)
    }

    pub fn can_submit(&self) -> bool {
        self.phase == WorkflowPhase::Loaded
            && self
                .order
                .as_ref()
                .is_some_and(|o| o.status != OrderStatus::Delivered)
    }

    /// Build the progress payload and enter `Saving`.
    pub fn begin_save(&mut self, force_complete: bool) -> Option<(EntityId, ProgressPayload)> {
        if !self.can_submit() {
            return None;
        }
        let id = self.order_id()?;
        let payload = ProgressPayload {
            completed_components: self
                .checklist
                .iter()
                .filter(|c| c.installed)
                .map(|c| c.id)
                .collect(),
            notes: non_empty(&self.notes),
            test_results: non_empty(&self.test_results),
            hours_spent: parse_hours(&self.hours_input),
            target_status: force_complete.then_some(OrderStatus::Completed),
        };
        self.phase = WorkflowPhase::Saving;
        Some((id, payload))
    }

    /// Server copy replaces order and checklist wholesale.
    pub fn finish_save(&mut self, order: AssemblyOrder) {
        if self.phase != WorkflowPhase::Saving || self.order_id() != Some(order.id) {
            return;
        }
        self.seed(order);
        // hours were added to the server total
        self.hours_input.clear();
        self.phase = WorkflowPhase::Loaded;
    }

    /// Keep local edits so the action can be retried.
    pub fn fail_save(&mut self) {
        if self.phase == WorkflowPhase::Saving {
            self.phase = WorkflowPhase::Loaded;
        }
    }
}

pub async fn load_order<G, C, N>(gateway: &G, state: &C, notify: &N, id: EntityId)
where
    G: AssemblyOrdersGateway + ?Sized,
    C: StateCell<OrderWorkflow>,
    N: NotificationSink,
{
    if state.update_with(|w| w.begin_load(id)) != Some(true) {
        return;
    }

    match gateway.get_by_id(id).await {
        Ok(order) => {
            log::debug!("loaded assembly order {}", order.order_number);
            state.update_with(|w| w.finish_load(order));
        }
        Err(e) => {
            let context = if e.is_not_found() {
                "Заказ не найден"
            } else {
                "Не удалось загрузить заказ"
            };
            let err = UiError::load(context, e);
            log::error!("{}", err);
            state.update_with(|w| w.fail_load(id, err.to_string()));
            notify.error(err.to_string());
        }
    }
}

pub async fn register_progress<G, C, N>(gateway: &G, state: &C, notify: &N, force_complete: bool)
where
    G: AssemblyOrdersGateway + ?Sized,
    C: StateCell<OrderWorkflow>,
    N: NotificationSink,
{
    let Some(Some((id, payload))) = state.update_with(|w| w.begin_save(force_complete)) else {
        return;
    };

    match gateway.register_progress(id, &payload).await {
        Ok(order) => {
            log::debug!(
                "progress saved for {}: {}% ({})",
                order.order_number,
                order.progress,
                order.status.code()
            );
            let message = if force_complete {
                format!("Заказ {} завершён", order.order_number)
            } else {
                format!("Прогресс по заказу {} сохранён", order.order_number)
            };
            state.update_with(|w| w.finish_save(order));
            notify.success(message);
        }
        Err(e) => {
            let err = UiError::mutation("Не удалось сохранить прогресс", e);
            log::warn!("{}", err);
            state.update_with(|w| w.fail_save());
            notify.error(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_assembly_order::api::fakes::{component, order, FakeOrders};
    use crate::shared::api_utils::ApiError;
    use crate::shared::notifications::testing::RecordingSink;
    use crate::shared::notifications::NoticeLevel;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Answers `register_progress` with a canned server copy.
    struct ScriptedOrders {
        current: AssemblyOrder,
        response: AssemblyOrder,
        payloads: RefCell<Vec<ProgressPayload>>,
    }

    #[async_trait(?Send)]
    impl AssemblyOrdersGateway for ScriptedOrders {
        async fn list(&self) -> Result<Vec<AssemblyOrder>, ApiError> {
            Ok(vec![self.current.clone()])
        }

        async fn get_by_id(&self, _id: EntityId) -> Result<AssemblyOrder, ApiError> {
            Ok(self.current.clone())
        }

        async fn replace(
            &self,
            _id: EntityId,
            _order: &AssemblyOrder,
        ) -> Result<Option<AssemblyOrder>, ApiError> {
            Ok(None)
        }

        async fn register_progress(
            &self,
            _id: EntityId,
            payload: &ProgressPayload,
        ) -> Result<AssemblyOrder, ApiError> {
            self.payloads.borrow_mut().push(payload.clone());
            Ok(self.response.clone())
        }
    }

    fn in_progress() -> AssemblyOrder {
        let mut o = order(7, "ENS-007", OrderStatus::InProgress);
        o.components = vec![component(101, "CPU", false), component(102, "RAM", false)];
        o.notes = Some("cliente espera".into());
        o.hours_spent = 3.0;
        o.progress = 20;
        o
    }

    fn state() -> Rc<RefCell<OrderWorkflow>> {
        Rc::new(RefCell::new(OrderWorkflow::default()))
    }

    fn loaded(current: AssemblyOrder) -> (FakeOrders, Rc<RefCell<OrderWorkflow>>, RecordingSink) {
        let id = current.id;
        let gateway = FakeOrders::with(vec![current]);
        let state = state();
        let sink = RecordingSink::default();
        block_on(load_order(&gateway, &state, &sink, id));
        (gateway, state, sink)
    }

    #[test]
    fn test_load_seeds_editable_fields() {
        let (_, state, sink) = loaded(in_progress());
        let w = state.borrow();
        assert_eq!(w.phase, WorkflowPhase::Loaded);
        assert_eq!(w.checklist.len(), 2);
        assert_eq!(w.notes, "cliente espera");
        assert_eq!(w.test_results, "");
        assert_eq!(w.hours_input, "");
        assert!(sink.notices.borrow().is_empty());
    }

    #[test]
    fn test_reloading_same_order_is_noop() {
        let (gateway, state, sink) = loaded(in_progress());
        state.borrow_mut().toggle_component(101);
        block_on(load_order(&gateway, &state, &sink, 7));

        assert_eq!(*gateway.calls.borrow(), vec!["get 7".to_string()]);
        assert!(state.borrow().checklist[0].installed);
    }

    #[test]
    fn test_hours_reset_on_new_load() {
        let mut other = order(8, "ENS-008", OrderStatus::Pending);
        other.hours_spent = 5.0;
        let gateway = FakeOrders::with(vec![in_progress(), other]);
        let state = state();
        let sink = RecordingSink::default();

        block_on(load_order(&gateway, &state, &sink, 7));
        state.borrow_mut().set_hours("2".into());
        block_on(load_order(&gateway, &state, &sink, 8));

        let w = state.borrow();
        assert_eq!(w.order_id(), Some(8));
        assert_eq!(w.hours_input, "");
        assert!(w.checklist.is_empty());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut w = OrderWorkflow::default();
        assert!(w.begin_load(1));
        assert!(w.begin_load(2));
        assert!(!w.finish_load(order(1, "ENS-001", OrderStatus::Pending)));
        assert_eq!(w.phase, WorkflowPhase::Loading(2));
        assert!(w.order.is_none());
    }

    #[test]
    fn test_load_failure() {
        let gateway = FakeOrders::default();
        let state = state();
        let sink = RecordingSink::default();
        block_on(load_order(&gateway, &state, &sink, 42));

        let w = state.borrow();
        assert_eq!(w.phase, WorkflowPhase::LoadError);
        assert!(w.error.as_deref().unwrap_or_default().starts_with("Заказ не найден"));
        assert_eq!(sink.levels(), vec![NoticeLevel::Error]);
        assert!(!w.can_submit());
    }

    #[test]
    fn test_progress_from_checklist_or_server() {
        let (_, state, _) = loaded(in_progress());
        assert_eq!(state.borrow().progress_percent(), 0);
        state.borrow_mut().toggle_component(102);
        assert_eq!(state.borrow().progress_percent(), 50);

        let mut bare = order(9, "ENS-009", OrderStatus::InProgress);
        bare.progress = 40;
        let (_, state, _) = loaded(bare);
        assert_eq!(state.borrow().progress_percent(), 40);
    }

    #[test]
    fn test_payload_fields() {
        let (_, state, _) = loaded(in_progress());
        let mut w = state.borrow_mut();
        w.toggle_component(102);
        w.set_notes("   ".into());
        w.set_test_results("  POST ok  ".into());
        w.set_hours(" 2.5 ".into());

        let (id, payload) = w.begin_save(false).unwrap();
        assert_eq!(id, 7);
        assert_eq!(payload.completed_components, vec![102]);
        assert_eq!(payload.notes, None);
        assert_eq!(payload.test_results.as_deref(), Some("POST ok"));
        assert_eq!(payload.hours_spent, Some(2.5));
        assert_eq!(payload.target_status, None);
        assert!(w.is_saving());
        assert!(!w.can_submit());
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours(""), None);
        assert_eq!(parse_hours("abc"), None);
        assert_eq!(parse_hours("-1"), None);
        assert_eq!(parse_hours("NaN"), None);
        assert_eq!(parse_hours("inf"), None);
        assert_eq!(parse_hours("0"), Some(0.0));
        assert_eq!(parse_hours("1.75"), Some(1.75));
    }

    #[test]
    fn test_force_complete_replaces_with_server_copy() {
        let current = in_progress();
        let mut response = current.clone();
        response.status = OrderStatus::Completed;
        response.progress = 100;
        response.technician = Some("Marta".into());
        response.components = vec![component(101, "CPU", true), component(102, "RAM", true)];
        let gateway = ScriptedOrders {
            current,
            response: response.clone(),
            payloads: RefCell::new(Vec::new()),
        };
        let state = state();
        let sink = RecordingSink::default();

        block_on(load_order(&gateway, &state, &sink, 7));
        state.borrow_mut().toggle_component(101);
        state.borrow_mut().toggle_component(102);
        block_on(register_progress(&gateway, &state, &sink, true));

        let payloads = gateway.payloads.borrow();
        assert_eq!(payloads.len(), 1);
        let body = serde_json::to_value(&payloads[0]).unwrap();
        assert_eq!(body["componentesCompletados"], serde_json::json!([101, 102]));
        assert_eq!(body["estadoDestino"], "Completed");

        let w = state.borrow();
        assert_eq!(w.phase, WorkflowPhase::Loaded);
        assert_eq!(w.order.as_ref(), Some(&response));
        assert_eq!(w.checklist, response.components);
        assert_eq!(sink.levels(), vec![NoticeLevel::Success]);
    }

    #[test]
    fn test_register_progress_without_force_keeps_status() {
        let (gateway, state, sink) = loaded(in_progress());
        state.borrow_mut().toggle_component(101);
        state.borrow_mut().set_hours("1.5".into());
        block_on(register_progress(&gateway, &state, &sink, false));

        let w = state.borrow();
        let saved = w.order.as_ref().unwrap();
        assert_eq!(saved.status, OrderStatus::InProgress);
        assert_eq!(saved.progress, 50);
        assert_eq!(saved.hours_spent, 4.5);
        assert_eq!(w.hours_input, "");
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let (gateway, state, sink) = loaded(in_progress());
        state.borrow_mut().toggle_component(101);
        state.borrow_mut().set_notes("falta fuente".into());
        gateway.set_failing(true);

        block_on(register_progress(&gateway, &state, &sink, true));

        let w = state.borrow();
        assert_eq!(w.phase, WorkflowPhase::Loaded);
        assert!(w.checklist[0].installed);
        assert_eq!(w.notes, "falta fuente");
        assert_eq!(w.order.as_ref().unwrap().status, OrderStatus::InProgress);
        assert_eq!(sink.levels(), vec![NoticeLevel::Error]);
        assert!(w.can_submit());
    }

    #[test]
    fn test_delivered_order_is_read_only() {
        let (gateway, state, sink) = loaded(order(3, "ENS-003", OrderStatus::Delivered));
        assert!(!state.borrow().can_submit());
        block_on(register_progress(&gateway, &state, &sink, false));
        assert!(gateway.replaced.borrow().is_empty());
        assert!(sink.notices.borrow().is_empty());
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id(" 12 "), Some(12));
        assert_eq!(parse_order_id("#5"), Some(5));
        assert_eq!(parse_order_id("0"), None);
        assert_eq!(parse_order_id("ENS-1"), None);
        assert_eq!(parse_order_id(""), None);
    }
}
