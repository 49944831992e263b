pub mod visibility;

pub use visibility::Visibility;
