//! A crate for representing logic functions as shared DAGs and packed covers.
//!
//! Three cooperating engines live here:
//!
//! - [`aig`] : and-inverter graphs with structural hashing, reference
//!   counting, sweep, and cut-based local rewriting.
//! - [`bdd`] : reduced ordered binary decision diagrams with a strongly
//!   canonical edge form, memoized apply operations, and garbage collection.
//! - [`sop`] : sum-of-products cube/cover algebra over packed bitvectors.
//!
//! Each manager is self-contained; handles keep their manager alive and
//! stay valid across sweeps, rewrites, and garbage collection.

#![allow(clippy::many_single_char_names)]

#[macro_use] extern crate log;

/// Error kinds shared by all three engines.
pub mod err;
pub use err::{Error, Result};

/// Literals: a variable index plus an inversion flag.
pub mod lit;
pub use lit::Lit;

/// Simple logic-expression trees (build/lower only; no parser).
pub mod expr;
pub use expr::Expr;

/// Binary io helpers for the dump/restore format.
pub mod binio;

/// Graphviz emission and the JSON options object it consumes.
pub mod dot;

/// And-inverter graphs.
pub mod aig;
pub use aig::{AigEdge, AigHandle, AigMgr, PrimOp};

/// Binary decision diagrams.
pub mod bdd;
pub use bdd::{Bdd, BddLit, BddMgr, BddVar, BddVarSet};

/// Sum-of-products covers.
pub mod sop;
pub use sop::{SopCover, SopCube};
