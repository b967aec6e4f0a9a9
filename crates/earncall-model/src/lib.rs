pub mod config;
pub mod fragment;
pub mod speaker;
pub mod target;

pub use config::*;
pub use fragment::*;
pub use speaker::*;
pub use target::*;
