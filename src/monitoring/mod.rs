/*!
 * Monitoring
 * Tracing setup shared by the library and the replay binary
 */

mod tracer;

pub use tracer::{init_tracing, span_replay};
