use serde::{Deserialize, Serialize};

/// Статус сборочного заказа.
///
/// Порядок вариантов совпадает с порядком прохождения заказа через цех.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    InProgress,
    InTesting,
    Completed,
    Delivered,
}

impl OrderStatus {
    /// Код статуса (совпадает с сериализованным значением)
    pub fn code(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::InTesting => "InTesting",
            OrderStatus::Completed => "Completed",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Ожидает",
            OrderStatus::InProgress => "В сборке",
            OrderStatus::InTesting => "Тестирование",
            OrderStatus::Completed => "Завершён",
            OrderStatus::Delivered => "Выдан",
        }
    }

    pub fn all() -> Vec<OrderStatus> {
        vec![
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::InTesting,
            OrderStatus::Completed,
            OrderStatus::Delivered,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    /// Следующий шаг рабочего процесса; у `Delivered` его нет.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::InProgress),
            OrderStatus::InProgress => Some(OrderStatus::InTesting),
            OrderStatus::InTesting => Some(OrderStatus::Completed),
            OrderStatus::Completed => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    /// Completed and Delivered orders no longer take assembly work.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Delivered)
    }
}

/// Приоритет заказа. Только для отображения и фильтрации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderPriority {
    High,
    Medium,
    Low,
}

impl OrderPriority {
    pub fn code(&self) -> &'static str {
        match self {
            OrderPriority::High => "High",
            OrderPriority::Medium => "Medium",
            OrderPriority::Low => "Low",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderPriority::High => "Высокий",
            OrderPriority::Medium => "Средний",
            OrderPriority::Low => "Низкий",
        }
    }

    pub fn all() -> Vec<OrderPriority> {
        vec![OrderPriority::High, OrderPriority::Medium, OrderPriority::Low]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.code() == code)
    }
}
