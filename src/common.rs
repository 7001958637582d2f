pub mod error;
pub mod i18n;
pub mod session_utils;
pub mod task_utils;
