pub mod campaign;
pub mod result;
