pub mod format;
pub mod receive;
pub mod transmit;
pub mod types;
pub mod zephir;
