// Coordination core of a web inspector front-end.
//
// # Threading
//
// Everything below `inspector` is single-threaded: the coordinator and its
// subsystems are mutated only from tasks on its own `EventLoop`, each of which
// runs head-to-tail. The only other threads are the tokio reader/writer tasks
// of `transport::WebSocketTransport`, which talk to the coordinator through
// channels. `parking_lot::Mutex` guards the process-wide debug log file.

/// Library version, for hosts that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod animation;
pub mod backend;
pub mod dispatch_queue;
pub mod dom;
pub mod editing;
pub mod event_loop;
pub mod focus;
pub mod host;
pub mod inspector;
pub mod links;
pub mod localization;
pub mod panels;
pub mod shortcuts;
pub mod transport;

pub use webinspector_config as config;
pub use webinspector_keybindings as keybindings;

pub use backend::{BackendError, BackendMessage, BackendRouter, DomainDispatcher};
pub use dom::{Anchor, Dom, ElementId, HeadlessDom};
pub use editing::{CommitEvent, EditingConfig, EditingHandle, EditingResult, MoveDirection};
pub use host::{Collaborators, InspectorHost};
pub use inspector::{ClickEvent, Inspector, LoadOutcome};
pub use panels::{CopyEvent, NavigationSource, Panel, PanelDescriptor};
