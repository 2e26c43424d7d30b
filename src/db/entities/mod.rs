//! SeaORM entities mapping to the database tables.
//!
//! Each entity lives in its own module (`user.rs`, `device.rs`,
//! `power_reading.rs`).

pub mod device;
pub mod power_reading;
pub mod user;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::device::Entity as Device;
    pub use super::device::Model as DeviceModel;
    pub use super::device::ActiveModel as DeviceActiveModel;
    pub use super::device::Column as DeviceColumn;

    pub use super::power_reading::Entity as PowerReading;
    pub use super::power_reading::Model as PowerReadingModel;
    pub use super::power_reading::ActiveModel as PowerReadingActiveModel;
    pub use super::power_reading::Column as PowerReadingColumn;
}
