mod loader;

pub use loader::{Catalog, LoadError};
