//! Object Wrappers (spec.md §4.4): typed handles for Window, Output, Seat
//! and their dependents.

pub mod output;
pub mod seat;
pub mod shm;
pub mod window;

pub use output::OutputHandle;
pub use seat::SeatHandle;
pub use shm::DecorationBuffer;
pub use window::WindowHandle;
