pub mod capture;
pub mod delta;
pub mod dependency;
pub mod provider;

pub use capture::capture;
pub use delta::diff;
pub use dependency::order_for_stop;
