//! Block-ingress dispatcher (spec C1): for each transaction, locate
//! reputation `OP_RETURN` outputs, decode the op, and route it to the
//! handler that owns it.

mod dispatcher;
mod error;
mod handlers;

pub use dispatcher::{BlockDispatcher, BlockProcessingSummary, SkippedTx};
pub use error::OpError;
