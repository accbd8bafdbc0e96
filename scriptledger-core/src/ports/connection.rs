//! Connection provider port - database access

use duckdb::Connection;

use crate::domain::result::Result;

/// Hands out database connections
///
/// Each call returns a connection owned by the caller; dropping it releases
/// it. Failure is `Error::ConnectionUnavailable`.
pub trait ConnectionProvider {
    fn get_connection(&self) -> Result<Connection>;
}

impl<T: ConnectionProvider + ?Sized> ConnectionProvider for &T {
    fn get_connection(&self) -> Result<Connection> {
        (**self).get_connection()
    }
}

impl<T: ConnectionProvider + ?Sized> ConnectionProvider for Box<T> {
    fn get_connection(&self) -> Result<Connection> {
        (**self).get_connection()
    }
}
