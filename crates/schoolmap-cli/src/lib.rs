//! schoolmap-cli
//! =============
//!
//! Command-line interface for `schoolmap-core`.
//!
//! This crate primarily provides a binary (`schoolmap`). The library target
//! only exists so the crate has a rendered documentation page.
//!
//! Basic usage:
//!
//! ```text
//! schoolmap --help
//! schoolmap -d schools.json stats
//! schoolmap -d schools.json filter Tech
//! schoolmap -c cities_map.json lookup Haifa
//! schoolmap -d schools.json -c cities_map.json in-view 32.7 34.9 32.9 35.1
//! schoolmap popup 'Address: Herzl 5<br>Site: <a href="x">x</a>'
//! ```
//!
//! `reconcile` needs the `http` feature.
#![cfg_attr(docsrs, feature(doc_cfg))]
