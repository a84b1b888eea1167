pub mod config;
pub mod ens;
pub mod error;
pub mod inbox;
pub mod neynar;
pub mod urls;

mod http;


pub use config::LookupConfig;
pub use ens::EnsClient;
pub use error::{LookupError, Result};
pub use inbox::{InboxClient, InboxDirectory};
pub use neynar::NeynarClient;
