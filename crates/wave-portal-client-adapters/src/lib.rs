pub mod clock;
pub mod config;
pub mod portal;
pub mod wallet;

pub use clock::SystemClockAdapter;
pub use config::{PortalAdapterConfig, RuntimeProfile, DEFAULT_CONTRACT_ADDRESS};
pub use portal::PortalAdapter;
pub use wallet::Eip1193WalletAdapter;
