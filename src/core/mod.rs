pub mod codec;
pub mod context;
pub mod managed;
pub mod showcase;

pub use crate::domain::model::{Person, SharedPerson};
pub use crate::domain::ports::{ConfigProvider, PersonFields, RecordStore};
pub use crate::utils::error::Result;
