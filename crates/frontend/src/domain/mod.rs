pub mod a001_assembly_order;
