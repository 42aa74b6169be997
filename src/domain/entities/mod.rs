pub mod cell;
pub mod column;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod row;
