//! Faultline - pooled error-context propagation for call chains.
//!
//! Faultline provides an exception-like error-propagation facility for
//! code that reports a failure once, attaches structured context (status
//! code, message, origin, accumulating trace), and lets the failure
//! travel up the call chain unexamined until an ancestor frame either
//! recovers from it by status code or lets it reach the terminal
//! unhandled-error hook.
//!
//! At the core sits a fixed pool of reusable error records, shared by
//! reference count across nested frames. Each record carries a bounded
//! trace of the propagation boundaries it crossed and a tri-state
//! disposition: in-flight, handled, or escaped unhandled.
//!
//! # Quick Start
//!
//! ```no_run
//! use faultline::ErrHandle;
//! use faultline::Flow;
//! use faultline::Scope;
//! use faultline::Status;
//! use faultline::catch;
//! use faultline::fail_break;
//! use faultline::finish;
//! use faultline::finish_terminal;
//!
//! fn risky() -> Option<ErrHandle> {
//!   let mut scope = Scope::enter("risky");
//!
//!   scope.attempt(|s| {
//!     fail_break!(s, Status::IO, "device not ready");
//!   });
//!   scope.dispatch();
//!
//!   finish!(scope)
//! }
//!
//! fn main() {
//!   let mut scope = Scope::enter("main");
//!
//!   scope.attempt(|s| {
//!     catch!(s, risky());
//!     Flow::Continue
//!   });
//!   scope.dispatch().handle(Status::IO, |record| {
//!     eprintln!("recovered: {}", record.message());
//!   });
//!
//!   finish_terminal!(scope);
//! }
//! ```
//!
//! # Core Modules
//!
//! - [`scope`]: The per-frame propagation protocol and macro family
//! - [`pool`]: The fixed-capacity record pool and owned handles
//! - [`record`]: Error records, origins, and traces
//! - [`names`]: Status-code display-name registry
//! - [`hooks`]: Pluggable log sink and unhandled-error hook
//! - [`consts`]: Capacities and limits

mod init;
mod utils;

pub mod consts;
pub mod hooks;
pub mod names;
pub mod pool;
pub mod record;
pub mod scope;
pub mod status;

pub use self::init::init;
pub use self::names::name_for;
pub use self::names::set_name;
pub use self::pool::ErrHandle;
pub use self::pool::release;
pub use self::record::ErrorRecord;
pub use self::record::Origin;
pub use self::record::Trace;
pub use self::record::TraceEntry;
pub use self::scope::Dispatch;
pub use self::scope::Flow;
pub use self::scope::Scope;
pub use self::status::Status;
