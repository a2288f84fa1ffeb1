//! Domain logic for personalized landing pages.
//!
//! Everything here is pure or close to it: the inline markup language,
//! `{{token}}` substitution, the section model with its defaults table,
//! HTML rendering, the in-memory builder canvas, contact import, bulk
//! generation over a [`generation::ContactStore`], and page delivery.

pub mod builder;
pub mod contact_import;
pub mod delivery;
pub mod error;
pub mod generation;
pub mod markup;
pub mod render;
pub mod section;
pub mod substitution;
pub mod types;
