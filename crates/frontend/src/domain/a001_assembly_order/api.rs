use async_trait::async_trait;
use contracts::domain::a001_assembly_order::{AssemblyOrder, ProgressPayload};
use contracts::domain::common::EntityId;
use contracts::enums::OrderStatus;

use crate::shared::api_utils::{ApiClient, ApiError};

const ORDERS_PATH: &str = "/api/assembly-orders";

/// Remote collection of assembly orders.
///
/// The API only offers a full `PUT`, so status changes and progress
/// registration are read-modify-write: fetch the current order, merge the
/// changed fields, put the whole object back. Two editors working on the same
/// order can overwrite each other's changes.
#[async_trait(?Send)]
pub trait AssemblyOrdersGateway {
    async fn list(&self) -> Result<Vec<AssemblyOrder>, ApiError>;

    async fn get_by_id(&self, id: EntityId) -> Result<AssemblyOrder, ApiError>;

    /// Full replace. `None` when the server answers with an empty body.
    async fn replace(
        &self,
        id: EntityId,
        order: &AssemblyOrder,
    ) -> Result<Option<AssemblyOrder>, ApiError>;

    async fn update_status(
        &self,
        id: EntityId,
        status: OrderStatus,
    ) -> Result<AssemblyOrder, ApiError> {
        let mut order = self.get_by_id(id).await?;
        order.apply_status(status);
        let stored = self.replace(id, &order).await?;
        Ok(stored.unwrap_or(order))
    }

    async fn register_progress(
        &self,
        id: EntityId,
        payload: &ProgressPayload,
    ) -> Result<AssemblyOrder, ApiError> {
        let mut order = self.get_by_id(id).await?;
        order.apply_progress(payload);
        let stored = self.replace(id, &order).await?;
        Ok(stored.unwrap_or(order))
    }
}

#[derive(Debug, Clone)]
pub struct HttpAssemblyOrdersGateway {
    client: ApiClient,
}

impl HttpAssemblyOrdersGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl AssemblyOrdersGateway for HttpAssemblyOrdersGateway {
    async fn list(&self) -> Result<Vec<AssemblyOrder>, ApiError> {
        self.client.get_json(ORDERS_PATH).await
    }

    async fn get_by_id(&self, id: EntityId) -> Result<AssemblyOrder, ApiError> {
        self.client.get_json(&format!("{}/{}", ORDERS_PATH, id)).await
    }

    async fn replace(
        &self,
        id: EntityId,
        order: &AssemblyOrder,
    ) -> Result<Option<AssemblyOrder>, ApiError> {
        self.client
            .put_json(&format!("{}/{}", ORDERS_PATH, id), order)
            .await
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{component, order, FakeOrders};
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_update_status_is_read_modify_write() {
        let mut current = order(1, "ENS-1", OrderStatus::InTesting);
        current.notes = Some("server side note".into());
        let gateway = FakeOrders::with(vec![current]);

        let updated = block_on(gateway.update_status(1, OrderStatus::Completed)).unwrap();

        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.progress, 100);
        assert_eq!(updated.notes.as_deref(), Some("server side note"));
        assert_eq!(*gateway.calls.borrow(), vec!["get 1".to_string(), "put 1".to_string()]);
    }

    #[test]
    fn test_register_progress_sends_whole_order() {
        let mut current = order(2, "ENS-2", OrderStatus::InProgress);
        current.components = vec![component(101, "CPU", false), component(102, "GPU", false)];
        let gateway = FakeOrders { echo: true, ..FakeOrders::with(vec![current]) };

        let payload = ProgressPayload {
            completed_components: vec![102],
            notes: Some("GPU seated".into()),
            test_results: None,
            hours_spent: Some(1.25),
            target_status: None,
        };
        let stored = block_on(gateway.register_progress(2, &payload)).unwrap();

        let sent = gateway.replaced.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], stored);
        assert_eq!(stored.progress, 50);
        assert_eq!(stored.hours_spent, 1.25);
        assert_eq!(stored.status, OrderStatus::InProgress);
    }

    #[test]
    fn test_missing_order_is_not_found() {
        let gateway = FakeOrders::default();
        let err = block_on(gateway.update_status(9, OrderStatus::Pending)).unwrap_err();
        assert!(err.is_not_found());
        assert!(gateway.replaced.borrow().is_empty());
    }
}
