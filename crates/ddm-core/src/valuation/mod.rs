pub mod pv_table;
