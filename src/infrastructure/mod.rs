pub mod db;
pub mod process;
pub mod storage;
