/// Идентификатор сущности. Назначается удалённой системой, клиент его не генерирует.
pub type EntityId = i64;

/// Трейт для записей с постоянным целочисленным идентификатором
pub trait Identified {
    fn id(&self) -> EntityId;
}
