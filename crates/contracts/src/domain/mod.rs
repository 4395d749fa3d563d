pub mod a001_assembly_order;
pub mod common;
