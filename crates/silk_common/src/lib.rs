//! Shared foundational types for the silk fitter.
//!
//! Provides the dense [`Arena`] container and the [`ArenaId`] trait used for
//! stable integer addressing of netlist and device entities throughout the
//! compilation pipeline.

#![warn(missing_docs)]

pub mod arena;

pub use arena::{Arena, ArenaId};

/// Declares an opaque `u32` ID newtype implementing [`ArenaId`].
///
/// The generated type is `Copy`, `Hash`, ordered, serializable, and prints as
/// its raw index.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the raw index widened to `usize` for direct indexing.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl $crate::ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
