pub mod manager;
pub mod socket;
pub mod state;

pub use manager::ConnectionManager;
pub use socket::SocketEvent;
pub use state::ConnectionState;
