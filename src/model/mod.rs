//! Model Module
//!
//! Domain types persisted by the store.
//!
//! ## JSON Shape (one line per invoice)
//! ```text
//! {"id":1,"number":"2019/07/1","issuedDate":"2019-07-16","dueDate":"2019-07-30",
//!  "seller":{...},"buyer":{...},"entries":[{...,"vatRate":"VAT_23"}]}
//! ```
//!
//! The store only looks inside a record for `id`, `number` and `issuedDate`;
//! everything else is carried through untouched.

mod company;
mod entry;
mod invoice;

pub use company::Company;
pub use entry::{InvoiceEntry, Vat};
pub use invoice::Invoice;
