//! pocketlink-host - Host side of the pocketlink serial link
//!
//! A blocking client that frames requests with the same codec the device
//! uses and waits for the matching reply.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use pocketlink_host::{open, Client};
//!
//! let port = open("/dev/ttyUSB0", 115_200, Duration::from_millis(50))?;
//! let mut client = Client::new(port, Duration::from_secs(1));
//! println!("{}", client.status()?);
//! # Ok::<(), pocketlink_host::ClientError>(())
//! ```

pub mod client;
pub mod error;
pub mod port;

pub use client::Client;
pub use error::ClientError;
pub use port::open;
