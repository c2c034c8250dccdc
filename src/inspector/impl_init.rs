//! Construction and lifecycle of the coordinator.

use url::Url;

use webinspector_config::SettingsStore;
use webinspector_keybindings::{KeybindingRegistry, Platform};

use super::{HighlightState, Inspector, Lifecycle, ModifierKeys};
use crate::animation::Animator;
use crate::backend::BackendRouter;
use crate::dispatch_queue::DispatchQueue;
use crate::editing::EditingManager;
use crate::event_loop::EventLoop;
use crate::focus::FocusTracker;
use crate::host::{Collaborators, parse_hidden_panels};
use crate::localization::Localizer;
use crate::panels::{PanelDescriptor, PanelRegistry};
use crate::transport::{self, BackendTransport, TransportError};

/// Result of [`Inspector::loaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Construction finished over the host's own channel.
    Ready,
    /// The query asked for a socket; call [`Inspector::socket_opened`] once it
    /// is connected.
    AwaitingSocket { url: Url },
}

impl Inspector {
    /// Create a coordinator. Panels are built later, by `loaded`.
    pub fn new(
        settings: SettingsStore,
        collaborators: Collaborators,
        panels: Vec<PanelDescriptor>,
    ) -> Self {
        let Collaborators {
            host,
            dom,
            search,
            drawer,
            toolbar,
            shortcuts_help,
            session_models,
        } = collaborators;

        let platform = Platform::from_host(&host.platform());
        log::info!(
            "Creating inspector for platform {:?} (port {})",
            platform,
            host.port()
        );

        Self {
            event_loop: EventLoop::new(),
            queue: DispatchQueue::new(),
            lifecycle: Lifecycle::Created,
            platform,
            settings,
            host,
            dom,
            search,
            drawer,
            toolbar,
            shortcuts_help,
            session_models,
            focus: FocusTracker::new(),
            editing: EditingManager::new(platform),
            panels: PanelRegistry::default(),
            pending_panels: panels,
            keybindings: KeybindingRegistry::new(platform),
            localizer: Localizer::default(),
            router: BackendRouter::new(),
            transport: None,
            animator: Animator::default(),
            focus_key_handlers: Default::default(),
            focus_copy_handlers: Default::default(),
            modifier_keys: ModifierKeys::default(),
            modifier_listeners: Vec::new(),
            follow_link_timer: None,
            highlight: HighlightState::default(),
        }
    }

    /// Page load entry point.
    ///
    /// `query` is the page's query string. A `ws` or `page` parameter asks for
    /// a socket transport; construction then waits for `socket_opened`.
    pub fn loaded(&mut self, query: &str) -> LoadOutcome {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("Inspector already loading or loaded");
            return LoadOutcome::Ready;
        }

        let params = transport::parse_query(query);
        match transport::socket_url(&params, &self.host.location_host()) {
            Ok(Some(url)) => {
                log::info!("Waiting for backend socket {}", url);
                self.lifecycle = Lifecycle::AwaitingSocket;
                return LoadOutcome::AwaitingSocket { url };
            }
            Ok(None) => {}
            Err(e) => log::error!("Ignoring socket request: {}", e),
        }

        self.do_loaded_done();
        LoadOutcome::Ready
    }

    /// The requested socket connected; it now carries all backend traffic.
    pub fn socket_opened(&mut self, transport: Box<dyn BackendTransport>) {
        if self.lifecycle != Lifecycle::AwaitingSocket {
            log::warn!("Unexpected backend socket; keeping current transport");
            return;
        }
        self.transport = Some(transport);
        self.do_loaded_done();
    }

    /// The requested socket could not be opened; fall back to the host channel.
    pub fn socket_failed(&mut self, error: &TransportError) {
        if self.lifecycle != Lifecycle::AwaitingSocket {
            return;
        }
        log::error!("Backend socket failed, using host channel: {}", error);
        crate::debug_error!("LIFECYCLE", "Socket failed: {}", error);
        self.do_loaded_done();
    }

    /// One-time construction of everything that needs the host.
    fn do_loaded_done(&mut self) {
        if self.lifecycle == Lifecycle::Loaded {
            return;
        }
        self.lifecycle = Lifecycle::Loaded;

        self.keybindings = KeybindingRegistry::from_config(self.settings.keybindings(), self.platform);

        self.localizer
            .set_annotate_missing(self.settings.show_unlocalized_strings_annotation());
        if let Some(url) = self.host.localized_strings_url()
            && let Err(e) = self.localizer.load_from_path(&url)
        {
            log::error!("{:#}", e);
        }

        let hidden = parse_hidden_panels(self.host.hidden_panels().as_deref());
        let descriptors = std::mem::take(&mut self.pending_panels);
        self.panels = PanelRegistry::build(descriptors, &hidden);

        let last_active = self.settings.last_active_panel().to_string();
        self.show_panel(&last_active);

        if self.settings.console_visible()
            && let Some(drawer) = self.drawer.as_mut()
        {
            drawer.set_visible(true);
        }

        match self.transport.as_mut() {
            Some(transport) => {
                if let Err(e) = transport.send("loaded".to_string()) {
                    log::error!("Failed to announce load over socket: {}", e);
                }
            }
            None => self.host.loaded(),
        }

        crate::debug_info!(
            "LIFECYCLE",
            "Loaded with panels {:?}, current {:?}",
            self.panels.order(),
            self.panels.current_key()
        );
        log::info!("Inspector loaded");
    }

    /// Clear per-session state without destroying panels.
    pub fn reset(&mut self) {
        log::info!("Resetting inspector session state");

        for model in &mut self.session_models {
            log::debug!("Resetting session model '{}'", model.name());
            model.reset();
        }
        for panel in self.panels.panels_mut() {
            if let Some(resettable) = panel.as_resettable() {
                resettable.reset();
            }
        }
        self.reset_highlight();
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.reset();
        }
    }

    /// The same front-end was attached to a new backend session.
    ///
    /// Commands still waiting on the old session fail with
    /// `BackendError::SessionClosed` before the domains are re-enabled.
    pub fn frontend_reused(&mut self) {
        self.router.fail_pending();
        let domains: Vec<String> = self
            .router
            .domain_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        for domain in domains {
            self.send_command(&format!("{}.enable", domain), None, None);
        }
        self.reset();
    }
}
