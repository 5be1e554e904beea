//! Scan workflow controller
//!
//! Drives one scan from user input through the service round-trip to the
//! rendered page. The controller is the only writer of its [`ScanPage`].

use crate::client::ScanService;
use crate::error::Result;
use crate::input::validate_input;
use crate::page::{ScanPage, StateEvent};
use crate::render::{present_error, render_results};
use crate::response::{ScanRequest, ScanResponse, interpret_reply};
use std::cell::{Ref, RefCell, RefMut};

/// Keys the input field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// User interactions with the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Input field text replaced
    Input(String),
    /// Scan button clicked
    Click,
    /// Key pressed in the input field
    KeyPress(Key),
}

/// Busy state held for the duration of a scan
///
/// Acquiring disables the trigger and enters `Loading`. Dropping re-enables the
/// trigger on every exit path, including unwinding and a dropped scan future.
/// The page is only borrowed inside these synchronous steps, never across an await.
struct BusyGuard<'a> {
    page: &'a RefCell<ScanPage>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(page: &'a RefCell<ScanPage>) -> Self {
        {
            let mut page = page.borrow_mut();
            page.trigger.enabled = false;
            page.trigger.busy = true;
            page.apply(StateEvent::Submitted);
        }
        Self { page }
    }

    fn page(&self) -> RefMut<'_, ScanPage> {
        self.page.borrow_mut()
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut page = self.page.borrow_mut();
        page.trigger.busy = false;
        page.trigger.enabled = true;
        page.apply(StateEvent::Released);
    }
}

/// Scan controller
///
/// Runs on a single thread. Methods take `&self` so input events can still be
/// delivered while a scan is waiting on the service.
pub struct ScanController<S> {
    service: S,
    page: RefCell<ScanPage>,
}

impl<S: ScanService> ScanController<S> {
    /// Create a controller over a scan service, starting idle
    pub fn new(service: S) -> Self {
        Self {
            service,
            page: RefCell::new(ScanPage::new()),
        }
    }

    /// Current page
    ///
    /// Drop the returned borrow before the next event is handled.
    pub fn page(&self) -> Ref<'_, ScanPage> {
        self.page.borrow()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Dispatch a user interaction
    pub async fn handle(&self, event: UiEvent) {
        match event {
            UiEvent::Input(text) => self.page.borrow_mut().input = text,
            UiEvent::Click | UiEvent::KeyPress(Key::Enter) => {
                let (enabled, raw) = {
                    let page = self.page.borrow();
                    (page.trigger.enabled, page.input.clone())
                };
                // Scan in flight
                if !enabled {
                    tracing::debug!(?event, "trigger disabled, ignoring");
                    return;
                }
                self.run_scan(&raw).await;
            }
            UiEvent::KeyPress(Key::Other) => {}
        }
    }

    /// Run one scan for the raw input text
    ///
    /// Every outcome ends in either the results or the error panel, with the
    /// trigger enabled again. Empty input goes straight to `ErrorShown` without
    /// passing through `Loading`, since the error region is only visible there.
    pub async fn run_scan(&self, raw_input: &str) {
        // Reject empty input before touching the network
        let request = match validate_input(raw_input) {
            Ok(request) => request,
            Err(e) => {
                Self::show_error(&mut self.page.borrow_mut(), &e.user_message());
                return;
            }
        };

        tracing::info!(url = %request.url, "scan started");
        let busy = BusyGuard::acquire(&self.page);

        // Only suspension point; the page is not borrowed here
        let outcome = Self::fetch(&self.service, &request).await;

        let mut page = busy.page();
        match outcome {
            Ok(response) => {
                render_results(&response, page.results_mut());
                page.apply(StateEvent::Rendered);
                tracing::info!(
                    url = %response.url,
                    risk_score = response.risk_score,
                    checks = response.checks.len(),
                    "scan finished"
                );
            }
            Err(e) => {
                tracing::error!(class = ?e.class(), error = %e, "scan failed");
                Self::show_error(&mut page, &e.user_message());
            }
        }
        // Release the borrow before the guard re-enables the trigger
        drop(page);
    }

    async fn fetch(service: &S, request: &ScanRequest) -> Result<ScanResponse> {
        let reply = service.submit(request).await?;
        interpret_reply(&reply)
    }

    fn show_error(page: &mut ScanPage, message: &str) {
        present_error(page.error_mut(), message);
        page.apply(StateEvent::Failed);
    }
}
