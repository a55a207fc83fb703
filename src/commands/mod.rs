pub mod alert;
pub mod help;
pub mod info;

pub use alert::*;
pub use help::*;
pub use info::*;
