//! Transaction input.
//!
//! Reading the `<transaction_index> <item_id>` file format and encoding the
//! result into a one-hot [`TransactionMatrix`] backed by a polars
//! `DataFrame`.

mod encoder;
mod reader;

pub use encoder::TransactionMatrix;
pub use reader::{MAX_TRANSACTION_INDEX, parse_transactions, read_transactions};
