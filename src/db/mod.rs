//! Persistence module split across logical submodules.

mod connection;
mod cursor;
mod pets;

pub use connection::{PetDbHelper, DATABASE_VERSION};
pub use cursor::{Cursor, Record, Rows};
pub(crate) use pets::{delete_pets, insert_pet, query_pets, update_pets};
