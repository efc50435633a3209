pub mod session;
pub mod transport;
pub mod types;

pub use session::{SessionManager, SessionPhase};
pub use transport::{HttpTransport, RpcTransport};
