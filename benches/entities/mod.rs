pub mod satellites;
