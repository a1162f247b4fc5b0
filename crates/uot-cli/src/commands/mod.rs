pub mod install;
pub mod pairs;
pub mod translate;

mod util;
