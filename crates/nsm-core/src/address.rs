//! Protocol addresses.

/// Announce request, sent by the client during the handshake.
pub const SERVER_ANNOUNCE: &str = "/nsm/server/announce";
/// Generic success reply. First argument echoes the request address.
pub const REPLY: &str = "/reply";
/// Generic error reply: `[address, code, message]`.
pub const ERROR: &str = "/error";

/// Open or create a project: `[path, display_name, client_id]`.
pub const CLIENT_OPEN: &str = "/nsm/client/open";
/// Save the current project.
pub const CLIENT_SAVE: &str = "/nsm/client/save";
/// Every client of the session has been opened.
pub const CLIENT_SESSION_IS_LOADED: &str = "/nsm/client/session_is_loaded";
/// Show the optional GUI.
pub const CLIENT_SHOW_OPTIONAL_GUI: &str = "/nsm/client/show_optional_gui";
/// Hide the optional GUI.
pub const CLIENT_HIDE_OPTIONAL_GUI: &str = "/nsm/client/hide_optional_gui";

/// Client has unsaved changes.
pub const CLIENT_IS_DIRTY: &str = "/nsm/client/is_dirty";
/// Client has no unsaved changes.
pub const CLIENT_IS_CLEAN: &str = "/nsm/client/is_clean";
/// Optional GUI became visible.
pub const CLIENT_GUI_IS_SHOWN: &str = "/nsm/client/gui_is_shown";
/// Optional GUI was hidden.
pub const CLIENT_GUI_IS_HIDDEN: &str = "/nsm/client/gui_is_hidden";
/// Progress of an open or save: `[f32]` in `[0, 1]`.
pub const CLIENT_PROGRESS: &str = "/nsm/client/progress";
/// Status message: `[priority, text]`.
pub const CLIENT_MESSAGE: &str = "/nsm/client/message";

// Coordinator-directed control addresses. Not used by the client engine.
/// Add a client to the session.
pub const SERVER_ADD: &str = "/nsm/server/add";
/// Save every client.
pub const SERVER_SAVE: &str = "/nsm/server/save";
/// Open a session.
pub const SERVER_OPEN: &str = "/nsm/server/open";
/// Create a session.
pub const SERVER_NEW: &str = "/nsm/server/new";
/// Copy the current session under a new name.
pub const SERVER_DUPLICATE: &str = "/nsm/server/duplicate";
/// Close the current session.
pub const SERVER_CLOSE: &str = "/nsm/server/close";
/// Close without saving.
pub const SERVER_ABORT: &str = "/nsm/server/abort";
/// Shut the coordinator down.
pub const SERVER_QUIT: &str = "/nsm/server/quit";
/// List available sessions.
pub const SERVER_LIST: &str = "/nsm/server/list";

/// Terminates a multi-message reply stream such as the answer to
/// [`SERVER_LIST`].
pub const LIST_DONE: &str = "";

/// Every address an adapter must never register a handler under.
pub const RESERVED: &[&str] = &[
    SERVER_ANNOUNCE,
    REPLY,
    ERROR,
    CLIENT_OPEN,
    CLIENT_SAVE,
    CLIENT_SESSION_IS_LOADED,
    CLIENT_SHOW_OPTIONAL_GUI,
    CLIENT_HIDE_OPTIONAL_GUI,
    CLIENT_IS_DIRTY,
    CLIENT_IS_CLEAN,
    CLIENT_GUI_IS_SHOWN,
    CLIENT_GUI_IS_HIDDEN,
    CLIENT_PROGRESS,
    CLIENT_MESSAGE,
    SERVER_ADD,
    SERVER_SAVE,
    SERVER_OPEN,
    SERVER_NEW,
    SERVER_DUPLICATE,
    SERVER_CLOSE,
    SERVER_ABORT,
    SERVER_QUIT,
    SERVER_LIST,
];

/// Whether `address` is built in or reserved for the coordinator.
#[must_use]
pub fn is_reserved(address: &str) -> bool {
    RESERVED.contains(&address)
}
