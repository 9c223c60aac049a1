//! # hotellisting-database
//!
//! Data access for HotelListing: storage backends (PostgreSQL and in-memory),
//! the generic [`Repository`], the [`UnitOfWork`] commit point, and the user
//! store consumed by authentication.

pub mod backend;
pub mod repository;
pub mod schema;
pub mod store;
pub mod unit_of_work;
pub mod users;

pub use backend::Backend;
pub use schema::SchemaReport;
pub use repository::{InsertTicket, Repository};
pub use store::{CommitReceipt, MemoryStore, Mutation, PageSlice, PgStore, Store};
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
pub use users::{MemoryUserStore, PgUserStore, UserStore};
