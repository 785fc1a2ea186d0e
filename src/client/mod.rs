//! Browser-side pieces of StreamLine: an API client, the page state machines
//! and the in-memory gallery.

pub mod api;
pub mod gallery;
pub mod pages;

pub use api::StreamlineClient;
pub use gallery::{Gallery, MediaItem, MediaKind};
pub use pages::{FormState, HomePage, LoginPage, Navigation, RegisterPage};
