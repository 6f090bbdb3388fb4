//! Job search: caller criteria in, store-independent `JobQuery` out.

pub mod criteria;
pub mod query;

pub use criteria::{JobSearchCriteria, SortDirection, SortField};
pub use query::{JobQuery, OrderBy, Pagination, Predicate, QueryBuilder, TextField};
