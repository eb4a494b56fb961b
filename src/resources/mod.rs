//! Resource facade module
//!
//! Per-resource entry points (`create`, `find`, `all`, `update`, `destroy`)
//! built on the transport, the JSON:API serializer and deserializer, and the
//! paginator.
//!
//! # Resources
//!
//! | Kind            | Path             | Notes                                  |
//! |-----------------|------------------|----------------------------------------|
//! | `items`         | `/items`         | open attribute set, `item_type` needed |
//! | `item_types`    | `/item-types`    |                                        |
//! | `menu_items`    | `/menu-items`    |                                        |
//! | `uploads`       | `/uploads`       | only `alt`/`title` are updatable       |
//! | `users`         | `/users`         | no update; `reset_password`            |
//! | `roles`         | `/roles`         |                                        |
//! | `access_tokens` | `/access-tokens` |                                        |
//! | `site`          | `/site`          | singleton: `fetch`, `update_singleton` |

mod kind;
mod resource;
mod schemas;

pub use kind::ResourceKind;
pub use resource::{AllOptions, Listing, Resource};
