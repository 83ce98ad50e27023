pub mod helpers;
pub mod mock_receiver;

pub use helpers::*;
pub use mock_receiver::{MockReceiver, MockReceiverError, ReceivedTransfer};
