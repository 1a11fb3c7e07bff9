/// Database utilities
///
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: embedded migration runner and dev-time database bootstrap

pub mod migrations;
pub mod pool;
