//!  Storage is organized through [file_store::FileStore] behind the [key_value::KeyValueStore]
//!  interface. The basic idea is:
//!   - There is a directory with all the state.
//!   - Every key is a separate json document: category lists, the weekly cache and one usage
//!     document per calendar day.
//!   - [state::StateStore] gives the documents their types.

pub mod file_store;
pub mod key_value;
pub mod state;
