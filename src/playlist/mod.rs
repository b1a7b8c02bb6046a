// Playlist navigation - the stateful core of the player
// Ordering happens once at load time, fuzzy matching backs up search

pub mod fuzzy;     // name similarity for search fallback
pub mod navigator; // cursor, filter, search, reorder, viewport
pub mod order;     // ascending / descending / random arrangement

pub use fuzzy::similarity;
pub use navigator::{Navigator, NavigatorEvent, NavigatorState, WindowRow};
pub use order::PlaylistOrder;
