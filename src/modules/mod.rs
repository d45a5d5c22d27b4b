pub mod authors;
pub mod books;
pub mod shared;

use bookstore_kernel::ModuleRegistry;
use sqlx::SqlitePool;

/// Register all resource modules with the registry
///
/// Books reference authors, so Authors is registered (and migrated) first.
pub fn register_all(registry: &mut ModuleRegistry, pool: SqlitePool) {
    registry.register(authors::create_module(pool.clone()));
    registry.register(books::create_module(pool));
}
