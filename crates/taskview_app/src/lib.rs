//! Taskview app: the owning-thread controller and the view adapter seam.
pub mod adapter;
pub mod controller;
pub mod logging;

pub use adapter::{TextListAdapter, ViewAdapter};
pub use controller::TaskListController;
