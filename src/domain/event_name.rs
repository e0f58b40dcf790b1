//! Event naming convention shared by producers and consumers.
//!
//! Events are colon-delimited, conventionally `<domain>:<verb>:<noun>`.
//! A client asks for data with a `get` event; whichever producer owns that
//! data answers by emitting the matching `set` event, e.g.
//! `data:get:user` is answered by `data:set:user`.

use std::borrow::Cow;

/// Verb segment marking a data request.
pub const GET_SEGMENT: &str = ":get:";

/// Verb segment marking a data response.
pub const SET_SEGMENT: &str = ":set:";

/// Returns the response event name for `event`.
///
/// Only the first `:get:` is replaced. Events without one are returned
/// unchanged (borrowed).
#[must_use]
pub fn set_event_for(event: &str) -> Cow<'_, str> {
    if event.contains(GET_SEGMENT) {
        Cow::Owned(event.replacen(GET_SEGMENT, SET_SEGMENT, 1))
    } else {
        Cow::Borrowed(event)
    }
}

/// Returns `true` when deriving the set event actually changed the name,
/// i.e. `event` is a data request.
#[must_use]
pub fn is_data_event(event: &str, set_event: &str) -> bool {
    event != set_event
}
