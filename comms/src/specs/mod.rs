pub mod fcnn;
