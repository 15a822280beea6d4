mod customer;
mod inventory;
mod order;
mod product;

pub use customer::*;
pub use inventory::*;
pub use order::*;
pub use product::*;
