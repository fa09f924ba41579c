/// log writer that persists batches of messages into a document store collection.
///
/// Each message is enriched with the fields of the request it was logged under, messages
/// that carry an exception are rewritten to the exception's trace, and the whole batch
/// goes to the store in one insert. Failures from the store are returned unchanged.
///
pub mod level;
pub mod message;
pub mod record;
pub mod store;
pub mod writer;

pub use level::Level;
pub use message::{Exception, LogMessage, RequestContext};
pub use record::{plain, DocumentDate, Enrichment, LogRecord};
pub use store::{DocumentStore, MemoryStore, StoreRegistry};
pub use writer::{DocumentLogWriter, LogWriter};
