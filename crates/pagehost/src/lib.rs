pub mod dom;
pub mod geometry;
pub mod macros;
pub mod memory;
pub mod timer;

pub use dom::{
    ClassName, Dom, ElementId, Host, NodeId, PointerId, ScrollBehavior, Selector, TagName, Window,
};
pub use geometry::{Point, translate_x};
pub use memory::{ElementSpec, HostError, MemoryDom, ScrollRequest};
pub use timer::{Scheduler, TimerId, VirtualClock};
