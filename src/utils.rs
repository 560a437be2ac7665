use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::PgConnection;

use crate::store::PgPool;

pub fn get_connection_pool(database_url: &str) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().test_on_check_out(true).build(manager)
}
