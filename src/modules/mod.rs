pub mod authors;

use bookstore_kernel::ModuleRegistry;
use sqlx::SqlitePool;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    registry.register(authors::create_module(pool.clone()));
}
