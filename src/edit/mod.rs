//! Transactional edit engine.
//!
//! Writes issued by an operation body are recorded in a ledger, staged in
//! placement bands and committed in attachment-safe order. Finished
//! operations are kept in a bounded history for undo/redo.

pub mod record;
pub mod ledger;
pub mod invalidator;
pub mod context;
pub mod scheduler;
pub mod operation;
pub mod history;
pub mod session;

pub use record::MutationRecord;
pub use ledger::{MutationLedger, PendingBand};
pub use invalidator::ChunkInvalidator;
pub use context::{EditContext, SessionEnv};
pub use scheduler::{resolve_final_order, CommitStats, FinalOrder};
pub use operation::{Operation, OperationBody, OperationReport, OperationState, SpatialTarget, TargetKind};
pub use history::EditHistory;
pub use session::EditSession;
