pub mod aggregate;

pub use aggregate::{completion_percent, AssemblyOrder, OrderComponent, ProgressPayload};
