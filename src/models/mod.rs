pub mod book;
pub mod loan;
pub mod patron;

pub use book::{Book, BookStatus};
pub use loan::Loan;
pub use patron::Patron;
