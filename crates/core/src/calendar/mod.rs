//! Economic calendar: durable store, live feed, sync, merged listing.

mod feed;
mod model;
mod store;
mod sync;

pub use feed::{parse_calendar_rows, CalendarFeed, MynetCalendarFeed};
pub use model::{country_id_for, synthesize_event_id, CalendarEvent, Impact, COUNTRY_MAP};
pub use store::CalendarStore;
pub use sync::CalendarSync;
