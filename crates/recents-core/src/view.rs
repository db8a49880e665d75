//! Presentation-side contracts.
//!
//! Rendering, drag-and-drop, menus, and pane management belong to the host;
//! this module only defines the seams the controller talks through. A host
//! implements [`RecentsPresenter`] for its list view and [`ViewHost`] for
//! its window/pane surface, and wires activation failures back via
//! [`CacheController::on_entry_missing`](crate::CacheController::on_entry_missing).

use crate::types::ListFrame;

/// The list view, as seen from the controller.
pub trait RecentsPresenter: Send + Sync {
    /// Path of the document currently active in the host, for highlighting.
    fn active_document(&self) -> Option<String>;

    /// Draw one frame. Called after every mutation the controller makes;
    /// implementations replace their previous rendering wholesale.
    fn render(&self, frame: &ListFrame);
}

/// The host surface that can create and focus the list view.
pub trait ViewHost {
    /// Whether a list view instance already exists.
    fn view_exists(&self) -> bool;

    /// Create the list view.
    fn create_view(&self);

    /// Bring the list view into focus.
    fn focus_view(&self);
}

/// The "open recently modified list view" command.
///
/// Idempotent: focuses an existing view instance if one exists, otherwise
/// creates one first.
pub fn open_list_view(host: &dyn ViewHost) {
    if !host.view_exists() {
        host.create_view();
    }
    host.focus_view();
}
