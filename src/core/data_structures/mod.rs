/*!
 * Data Structures
 * Small specialized containers shared across the manager
 */

mod block_name;

pub use block_name::BlockName;
