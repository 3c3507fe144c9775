mod zephir;

pub use zephir::ZephirFormat;
