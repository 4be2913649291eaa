pub mod product; // Catalog product entity and its category enum

pub use product::{Category, NewProduct};
