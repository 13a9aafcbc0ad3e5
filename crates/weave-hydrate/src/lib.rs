//! Consumer side of the docweave tree transport.
//!
//! An encoded tree names its components by string only. This crate turns it
//! back into a [`LiveNode`] tree by resolving those names against a
//! consumer-owned [`Registry`]:
//!
//! - the grouping identifier becomes a [`ElementKind::Fragment`]
//! - a registered name becomes a [`ElementKind::Component`], even when it
//!   shadows a built-in tag
//! - any other lowercase name is a built-in tag ([`ElementKind::Intrinsic`])
//! - anything else is reported as an [`UnresolvedComponent`] and rendered as
//!   a fragment of its children
//!
//! [`render_to_string`] renders the resulting tree as HTML, and [`serialize`]
//! encodes it back into the wire format.
//!
//! # Example
//!
//! ```
//! use weave_hydrate::{LiveProps, Registry, deserialize, render_to_string};
//!
//! let registry = Registry::new().with("Note", |_: &LiveProps, children: &str| {
//!     format!("<aside>{children}</aside>")
//! });
//! let json = r##"["$r","#group",null,{"children":["$r","Note",null,{"children":"Hi"}]}]"##;
//!
//! let hydrated = deserialize(json, &registry).unwrap();
//! assert!(hydrated.warnings.is_empty());
//! assert_eq!(render_to_string(&hydrated.node), "<aside>Hi</aside>");
//! ```

mod deserialize;
mod encode;
mod live;
mod registry;
mod render;

pub use deserialize::{HydrateError, Hydrated, UnresolvedComponent, deserialize, from_wire};
pub use encode::{serialize, to_wire};
pub use live::{ElementKind, LiveElement, LiveNode, LiveProps};
pub use registry::{Component, Registry};
pub use render::{escape_html, kebab_case, render_to_string};

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::Registry: Send, Sync);
    static_assertions::assert_impl_all!(super::LiveNode: Send, Sync);
}
