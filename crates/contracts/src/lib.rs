//! Wire contracts shared between the assembly-shop frontend and its remote API.

pub mod domain;
pub mod enums;
pub mod system;
