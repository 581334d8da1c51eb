mod level; pub use level::*;
mod logger; pub use logger::*;
mod msg_fmt; pub use msg_fmt::*;
pub mod targets; pub use targets::*;
