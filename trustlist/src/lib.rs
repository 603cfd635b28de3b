#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod chain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod harvest;
pub mod model;
pub mod settings;
pub mod vocab;
pub mod xml;

pub use crate::{
    chain::*, error::*, extract::*, fetch::*, harvest::*, model::*, settings::*, vocab::*, xml::*,
};
