//! Additional, more convenient, functionality, which leverages the Rust
//! standard library, layered on top of [`kombi_core`].
//!
//! This crate:
//!
//! * Re-exports all of [`kombi_core`].
//!
//! * Provides a [`MemoTable`] that is a standard [`HashMap`], which is what the
//! [ready-made](common/index.html) entry points use.
//!
//! * Provides [entry points](common/index.html) for parsing in-memory inputs
//! and inputs read from any [`Read`].
//!
//! * Provides a [pretty-printer](pprint/index.html) of value trees, which
//! writes one node per line, to any [`Write`].
//!
//! Unlike [`kombi_core`], this crate's purpose mostly is to provide premade
//! implementations intended for ready use.  So, instead of placing such items
//! in sub-modules named `premade`, they are placed at the top of their
//! respective modules, including for the premade items re-exported from
//! `kombi_core`.
//!
//! [`kombi_core`]: ../kombi_core/index.html
//! [`MemoTable`]: ../kombi_core/memo/trait.MemoTable.html
//! [`HashMap`]: http://doc.rust-lang.org/std/collections/struct.HashMap.html
//! [`Read`]: http://doc.rust-lang.org/std/io/trait.Read.html
//! [`Write`]: http://doc.rust-lang.org/std/io/trait.Write.html


// Re-export everything from the core crate. (Except items shadowed by ours,
// which are re-exported elsewhere.)
#[doc(no_inline)]
pub use kombi_core::*;

/// Ready-made entry points that choose the memo table for you.
pub mod common {
    pub mod inmem;
    pub mod stream;
}

/// Memo tables that use the `std` library.  Also re-exports the core crate's
/// module and premades.
pub mod memo {
    #[doc(no_inline)]
    pub use kombi_core::memo::{*, premade::*};

    mod hashmap_memo;
    pub use hashmap_memo::HashMapMemo;
}

pub mod pprint;

pub use common::stream::ReadError;
