use serde::{Deserialize, Serialize};

use crate::domain::common::{EntityId, Identified};
use crate::enums::{OrderPriority, OrderStatus};

/// Комплектующая сборочного заказа (пункт чек-листа)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderComponent {
    pub id: EntityId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo", default)]
    pub kind: Option<String>,
    #[serde(rename = "instalado", default)]
    pub installed: bool,
}

/// Сборочный заказ (агрегат a001)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyOrder {
    pub id: EntityId,

    /// Номер заказа (напр. "ENS-2024-0012")
    #[serde(rename = "numeroOrden")]
    pub order_number: String,

    #[serde(rename = "cliente")]
    pub customer: String,

    /// Описание собираемого изделия
    #[serde(rename = "producto")]
    pub product: String,

    #[serde(rename = "estado")]
    pub status: OrderStatus,

    #[serde(rename = "prioridad")]
    pub priority: OrderPriority,

    /// Последний сохранённый на сервере процент готовности (0..=100)
    #[serde(rename = "progreso", default)]
    pub progress: u8,

    /// Дата создания (YYYY-MM-DD)
    #[serde(rename = "fechaCreacion")]
    pub created_at: String,

    /// Плановая дата выдачи (YYYY-MM-DD)
    #[serde(rename = "fechaEntrega", default)]
    pub due_date: Option<String>,

    #[serde(rename = "tecnicoAsignado", default)]
    pub technician: Option<String>,

    #[serde(rename = "componentes", default)]
    pub components: Vec<OrderComponent>,

    #[serde(rename = "notas", default)]
    pub notes: Option<String>,

    #[serde(rename = "resultadosPruebas", default)]
    pub test_results: Option<String>,

    /// Суммарно затраченные часы по всем сессиям
    #[serde(rename = "horasTrabajadas", default)]
    pub hours_spent: f64,
}

impl Identified for AssemblyOrder {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Регистрация прогресса сборки.
///
/// Absent optional fields are left out of the body entirely; an absent
/// `target_status` means the current status is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    #[serde(rename = "componentesCompletados")]
    pub completed_components: Vec<EntityId>,
    #[serde(rename = "notas", skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    #[serde(rename = "resultadosPruebas", skip_serializing_if = "Option::is_none", default)]
    pub test_results: Option<String>,
    #[serde(rename = "horasTrabajadas", skip_serializing_if = "Option::is_none", default)]
    pub hours_spent: Option<f64>,
    #[serde(rename = "estadoDestino", skip_serializing_if = "Option::is_none", default)]
    pub target_status: Option<OrderStatus>,
}

/// `round(100 * installed / total)`, or `None` for an empty checklist.
pub fn completion_percent(installed: usize, total: usize) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let installed = installed.min(total);
    Some(((installed as f64 * 100.0) / total as f64).round() as u8)
}

impl AssemblyOrder {
    pub fn installed_count(&self) -> usize {
        self.components.iter().filter(|c| c.installed).count()
    }

    /// Заказ просрочен: дата выдачи прошла, а работа ещё не закончена.
    pub fn is_overdue(&self, today: chrono::NaiveDate) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.due_date
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|due| due < today)
            .unwrap_or(false)
    }

    /// Merge a progress registration into this order (read-modify-write on the
    /// full object; concurrent editors can overwrite each other).
    pub fn apply_progress(&mut self, payload: &ProgressPayload) {
        for component in &mut self.components {
            component.installed = payload.completed_components.contains(&component.id);
        }
        if let Some(notes) = &payload.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(results) = &payload.test_results {
            self.test_results = Some(results.clone());
        }
        if let Some(hours) = payload.hours_spent {
            if hours.is_finite() && hours >= 0.0 {
                self.hours_spent += hours;
            }
        }
        if let Some(percent) = completion_percent(self.installed_count(), self.components.len()) {
            self.progress = percent;
        }
        if let Some(status) = payload.target_status {
            self.apply_status(status);
        }
    }

    pub fn apply_status(&mut self, status: OrderStatus) {
        self.status = status;
        if status.is_terminal() {
            self.progress = 100;
        }
    }
}
