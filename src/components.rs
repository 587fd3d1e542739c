pub mod bracket;
pub mod match_table;
