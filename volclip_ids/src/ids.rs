//! Handles for objects a world owns. A handle packs a slot number (low half)
//! and the slot's generation (high half) into one `u64`; slot 0 is never
//! allocated, so the zero handle means "none".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error from parsing a handle written as `slot:generation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseHandleError(pub String);

impl fmt::Display for ParseHandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed handle `{}`, expected slot:generation", self.0)
    }
}

impl std::error::Error for ParseHandleError {}

macro_rules! handle {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const NIL: Self = Self(0);

            #[inline]
            pub const fn nil() -> Self {
                Self::NIL
            }

            #[inline]
            pub const fn new(slot: u32, generation: u32) -> Self {
                Self(((generation as u64) << 32) | slot as u64)
            }

            #[inline]
            pub const fn slot(self) -> u32 {
                self.0 as u32
            }

            #[inline]
            pub const fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }

            #[inline]
            pub const fn is_nil(self) -> bool {
                self.slot() == 0
            }

            #[inline]
            pub const fn to_bits(self) -> u64 {
                self.0
            }

            #[inline]
            pub const fn from_bits(bits: u64) -> Self {
                Self(bits)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.slot(), self.generation())
            }
        }

        impl FromStr for $name {
            type Err = ParseHandleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let err = || ParseHandleError(s.to_string());
                let (slot, generation) = s.trim().split_once(':').ok_or_else(err)?;
                let slot = slot.parse::<u32>().map_err(|_| err())?;
                let generation = generation.parse::<u32>().map_err(|_| err())?;
                Ok(Self::new(slot, generation))
            }
        }
    };
}

handle!(ActorID, "An actor in a world's actor arena.");
handle!(LevelID, "A level loaded into a world, persistent or streamed.");
