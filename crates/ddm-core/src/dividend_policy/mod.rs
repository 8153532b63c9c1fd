pub mod dividend_table;
pub mod gordon_growth;
pub mod h_model;
