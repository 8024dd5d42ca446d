//! Gatekeeper for leaving the page with an unsaved selection.
//!
//! The host forwards three kinds of events: link clicks, history traversals
//! (back/forward) and unload attempts. All three consult the same predicate,
//! [`NavigationGuard::is_armed`], which holds while the pending selection is
//! not empty.

use reqwest::Url;

use super::link::LinkClick;
use crate::{
    error::{PortalError, PortalResult},
    session::PendingSelection,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// Let the browser handle the click
    PassThrough,
    /// Default navigation must be prevented; a prompt is pending
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryDecision {
    PassThrough,
    /// Push this URL back onto the history immediately, then show the prompt
    Reassert(Url),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    PassThrough,
    /// Ask the browser for its own leave-page confirmation
    NativePrompt,
}

/// Destination held while the prompt is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingNavigation {
    Link(Url),
    History(Url),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Stay,
    LeaveAnyway,
}

/// Navigation the host must perform after "leave anyway"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationCommand {
    /// In-app navigation to the clicked link
    Navigate(Url),
    /// Redo the history traversal that was neutralized
    Traverse(Url),
}

pub struct NavigationGuard {
    selection: PendingSelection,
    origin: Url,
    current: Url,
    pending: Option<PendingNavigation>,
}

impl NavigationGuard {
    pub fn new(selection: PendingSelection, origin: &str, current: &str) -> PortalResult<Self> {
        let origin = parse_url(origin)?;
        let current = origin
            .join(current)
            .map_err(|e| PortalError::Internal(format!("Invalid current URL {}: {}", current, e)))?;

        Ok(Self {
            selection,
            origin,
            current,
            pending: None,
        })
    }

    pub fn is_armed(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn current(&self) -> &Url {
        &self.current
    }

    /// Destination awaiting the reader's choice, if a prompt is open
    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    /// Record a completed navigation
    pub fn did_navigate(&mut self, url: Url) {
        self.current = url;
    }

    pub fn on_link_click(&mut self, click: &LinkClick) -> LinkDecision {
        if !self.is_armed() {
            return LinkDecision::PassThrough;
        }
        let Some(destination) = self.in_app_destination(click) else {
            return LinkDecision::PassThrough;
        };

        tracing::warn!(
            destination = %destination,
            selected = self.selection.len(),
            "Navigation blocked by unsaved selection"
        );
        self.pending = Some(PendingNavigation::Link(destination));
        LinkDecision::Blocked
    }

    /// Handle a back/forward traversal that already moved to `attempted`.
    ///
    /// When armed, the host must re-push the returned URL before doing
    /// anything else, which keeps the reader on the current view.
    pub fn on_history_pop(&mut self, attempted: Url) -> HistoryDecision {
        if !self.is_armed() {
            self.current = attempted;
            return HistoryDecision::PassThrough;
        }

        tracing::warn!(
            attempted = %attempted,
            selected = self.selection.len(),
            "History traversal blocked by unsaved selection"
        );
        self.pending = Some(PendingNavigation::History(attempted));
        HistoryDecision::Reassert(self.current.clone())
    }

    /// Tab or window close. The outcome of the native prompt is not
    /// observable, so the selection is left as is.
    pub fn on_before_unload(&self) -> UnloadDecision {
        if self.is_armed() {
            UnloadDecision::NativePrompt
        } else {
            UnloadDecision::PassThrough
        }
    }

    /// Close the prompt with the reader's choice
    pub fn resolve(&mut self, choice: PromptChoice) -> Option<NavigationCommand> {
        let pending = self.pending.take()?;

        match choice {
            PromptChoice::Stay => {
                tracing::debug!(?pending, "Reader stayed on page");
                None
            }
            PromptChoice::LeaveAnyway => {
                let dropped = self.selection.clear();
                tracing::info!(dropped, "Selection discarded on leave");
                Some(match pending {
                    PendingNavigation::Link(url) => NavigationCommand::Navigate(url),
                    PendingNavigation::History(url) => NavigationCommand::Traverse(url),
                })
            }
        }
    }

    /// Resolve a click to a same-origin destination that leaves the current
    /// document, or `None` for anything the guard must not touch.
    fn in_app_destination(&self, click: &LinkClick) -> Option<Url> {
        if !click.opens_in_place() {
            return None;
        }
        let href = click.href.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
        let url = self.current.join(href).ok()?;

        if !matches!(url.scheme(), "http" | "https") || url.origin() != self.origin.origin() {
            return None;
        }
        if url.fragment().is_some() && same_document(&url, &self.current) {
            return None;
        }
        Some(url)
    }
}

fn parse_url(raw: &str) -> PortalResult<Url> {
    Url::parse(raw).map_err(|e| PortalError::Internal(format!("Invalid URL {}: {}", raw, e)))
}

fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}
