pub mod config;
pub mod domain;

pub use chrono;
pub use config::{AppConfig, ConfigError, DatabaseConfig, LoadOptions, LoggingConfig};
pub use domain::customer::{Customer, CustomerId};
pub use domain::reservation::{Reservation, ReservationId};
