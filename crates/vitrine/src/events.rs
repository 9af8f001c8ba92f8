use crate::config::Key;
use crate::script::Step;
use pagehost::{NodeId, Point, PointerId, TimerId};

/// Input delivered by the host, the way a browser dispatches DOM events.
/// `target` is the innermost element the event hit.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click(NodeId),
    MouseEnter(NodeId),
    MouseLeave(NodeId),
    KeyDown {
        target: NodeId,
        key: Key,
    },
    PointerDown {
        target: NodeId,
        pointer: PointerId,
        position: Point,
    },
    PointerUp {
        target: NodeId,
        pointer: PointerId,
        position: Point,
    },
    PointerCancel {
        target: NodeId,
        pointer: PointerId,
    },
    Resize,
    Scroll,
    Tick(TimerId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Ui(UiEvent),
    Step(Step),
    ConfigReload,
    Quit,
}
