//! Push-notification channel registration.

pub mod ports;
pub mod registrar;

pub use registrar::ChannelRegistrar;
