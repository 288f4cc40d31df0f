pub mod error_mapping;
pub mod favorites;
pub mod map;
pub mod session;
pub mod storage;

pub use favorites::{FavoriteEntry, FavoritesStore};
pub use map::{MapWidget, NoopMap};
pub use session::{
    DetailPanel, DisplayModel, FavoriteCard, FetchTicket, ForecastCard, SearchOutcome,
    WeatherSession,
};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
