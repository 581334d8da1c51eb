mod config; pub use config::*;
mod file_size; pub use file_size::*;
mod manager; pub use manager::*;
