// Provider implementations for package registries
pub mod npms;

pub use npms::NpmsProvider;
