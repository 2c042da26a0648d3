pub mod settings;

pub use settings::PinboardConfig;
