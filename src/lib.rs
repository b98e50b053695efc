pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod remote;
pub mod resolver;
pub mod session;
pub mod types;

pub use cache::NameIdCache;
pub use cache::response::ResponseCache;
pub use config::{BackendConfig, Config};
pub use error::{Result, SluiceError};
pub use remote::http::HttpCascadeBackend;
pub use remote::{CascadeBackend, CascadeParams};
pub use resolver::CascadeResolver;
pub use session::{FilterChangeListener, FilterSessionController, PanelState};
pub use types::{
    BaseOptions, CASCADING_CATEGORIES, CascadeOption, CascadeOverrides, FilterCategory,
    OptionSets, Selection, normalize_name,
};
