//! Persistence for Petri nets.
//!
//! Two forms are supported:
//!
//! - the native JSON document ([`native`]), which mirrors the net model
//!   field for field, and
//! - PNML ([`pnml`]), the interchange format shared with other tools.
//!
//! Both decode into [`NetDto`] first and are rebuilt into a net through
//! [`NetDto::into_net`]. Malformed values never fail an import; they are
//! defaulted and reported as [`Warnings`]. Only documents that cannot be
//! parsed at all produce a [`CodecError`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dto;
pub mod error;
pub mod file;
pub mod native;
pub mod pnml;
pub mod warnings;

pub use dto::{ArcDto, MarkingDto, NetDto, PlaceDto, PositionDto, TransitionDto};
pub use error::CodecError;
pub use file::{export_file, export_str, import_file, import_str, Import, NetFormat};
pub use native::{decode_native, encode_native};
pub use pnml::{decode_pnml, encode_pnml, PnmlOptions, IMPORT_OFFSET, PNML_NAMESPACE};
pub use warnings::Warnings;
