//! Stateful engines behind the admin endpoints.
//!
//! [`MappingManager`] and [`TalkLifecycleManager`] are the only writers of
//! mapping rows and talk lifecycle state. [`ValidationSweep`] is read-only.
//! Each holds its own pool handle and is cheap to construct per request.

pub mod audit;
pub mod mapping_manager;
pub mod talk_lifecycle;
pub mod validation_sweep;

pub use audit::TracingAuditSink;
pub use mapping_manager::{MappingChange, MappingManager};
pub use talk_lifecycle::{HardDeleteSummary, TalkLifecycleManager};
pub use validation_sweep::ValidationSweep;
